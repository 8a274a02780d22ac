//! # Decodificador de Viterbi Genérico
//!
//! Motor de programação dinâmica que encontra o caminho de rótulos de
//! maior probabilidade para uma sequência, trabalhando em espaço de
//! probabilidade (não log-space: os pisos dos modelos garantem scores
//! estritamente positivos). Para uma sequência de comprimento $n$ com $m$
//! rótulos:
//!
//! ```text
//! inicialização:  score[0][s] = initial(s)
//! recorrência:    score[t][s] = max_prev score[t-1][prev] · step(t, prev, s)
//! término:        argmax da última coluna; reconstrução por backpointers
//! ```
//!
//! O motor é parametrizado por um [`LatticeScorer`]: HMM e MEMM são duas
//! pontuações intercambiáveis da mesma treliça. Empates resolvem para o
//! primeiro maximizador na ordem de rótulos do scorer (comparação estrita
//! `>`), tornando a decodificação determinística.
//!
//! ## Reescrita de backpointers ([`StepScore::older`])
//!
//! Um passo pode devolver, além da probabilidade, o índice de um rótulo
//! "mais antigo" (caso do HMM com interpolação de trigramas). Quando o
//! candidato correspondente vira o máximo corrente, o motor grava esse
//! índice no backpointer da coluna anterior do estado de origem.
//! Avaliações posteriores de outros estados podem regravar o mesmo slot
//! antes da reconstrução; a trajetória devolvida reflete o último
//! vencedor, e em sequências longas pode divergir do caminho ótimo do
//! modelo de segunda ordem. É o comportamento documentado da recorrência.

/// Resultado de um passo da treliça.
#[derive(Debug, Clone, Copy)]
pub struct StepScore {
    /// Probabilidade do passo (transição e emissão já combinadas).
    pub prob: f64,
    /// Rótulo "mais antigo" a gravar no backpointer da coluna anterior,
    /// quando a pontuação usa contexto de segunda ordem.
    pub older: Option<usize>,
}

/// Pontuação de uma sequência concreta.
///
/// Um scorer amarra um modelo a uma única sequência de entrada; o motor
/// consulta apenas índices de posição e de rótulo.
pub trait LatticeScorer {
    /// Comprimento da sequência a decodificar.
    fn len(&self) -> usize;

    /// Conjunto ordenado de rótulos (estados da treliça).
    fn labels(&self) -> &[String];

    /// Score do estado `state` na posição 0.
    fn initial(&self, state: usize) -> f64;

    /// Score do passo `prev → state` na posição `position` (≥ 1).
    fn step(&self, position: usize, prev: usize, state: usize) -> StepScore;
}

/// Decodifica a sequência do scorer, devolvendo um rótulo por posição.
///
/// Sequência vazia devolve caminho vazio sem consultar o scorer.
///
/// # Panics
///
/// Entra em pânico se o scorer não tiver rótulos para uma sequência não
/// vazia, ou se todos os candidatos de um estado pontuarem zero — os
/// pisos de probabilidade dos modelos deste crate tornam esse beco sem
/// saída inalcançável.
pub fn decode<S: LatticeScorer>(scorer: &S) -> Vec<String> {
    let n = scorer.len();
    if n == 0 {
        return Vec::new();
    }
    let labels = scorer.labels();
    let m = labels.len();
    if m == 0 {
        panic!("cannot decode a non-empty sequence without labels");
    }

    // score[t][s]: melhor probabilidade terminando no estado s no passo t
    let mut scores = vec![vec![0.0f64; m]; n];
    // backptr[t][s]: melhor predecessor do estado s no passo t
    let mut backptr = vec![vec![0usize; m]; n];

    for state in 0..m {
        scores[0][state] = scorer.initial(state);
    }

    for position in 1..n {
        for state in 0..m {
            let mut best = 0.0f64;
            let mut best_prev: Option<usize> = None;
            for prev in 0..m {
                let step = scorer.step(position, prev, state);
                let candidate = scores[position - 1][prev] * step.prob;
                if candidate > best {
                    best = candidate;
                    best_prev = Some(prev);
                    if let Some(older) = step.older {
                        backptr[position - 1][prev] = older;
                    }
                }
            }
            scores[position][state] = best;
            backptr[position][state] = match best_prev {
                Some(prev) => prev,
                None => panic!(
                    "viterbi lattice dead-ends at position {position}: every candidate for state {} scored zero",
                    labels[state]
                ),
            };
        }
    }

    // término: primeiro argmax da última coluna
    let mut best_state = 0;
    for state in 1..m {
        if scores[n - 1][state] > scores[n - 1][best_state] {
            best_state = state;
        }
    }

    // reconstrução de trás para frente
    let mut path = vec![String::new(); n];
    let mut state = best_state;
    for position in (0..n).rev() {
        path[position] = labels[state].clone();
        state = backptr[position][state];
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scorer de teste com transições constantes em todas as posições.
    struct FixedScorer {
        labels: Vec<String>,
        init: Vec<f64>,
        /// trans[prev][state]
        trans: Vec<Vec<f64>>,
        len: usize,
        older: Option<usize>,
    }

    impl FixedScorer {
        fn new(init: Vec<f64>, trans: Vec<Vec<f64>>, len: usize) -> Self {
            let labels = ["a", "b"].iter().map(|s| s.to_string()).collect();
            Self {
                labels,
                init,
                trans,
                len,
                older: None,
            }
        }
    }

    impl LatticeScorer for FixedScorer {
        fn len(&self) -> usize {
            self.len
        }

        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn initial(&self, state: usize) -> f64 {
            self.init[state]
        }

        fn step(&self, _position: usize, prev: usize, state: usize) -> StepScore {
            StepScore {
                prob: self.trans[prev][state],
                older: self.older,
            }
        }
    }

    #[test]
    fn test_empty_sequence_decodes_to_empty_path() {
        let scorer = FixedScorer::new(vec![1.0, 1.0], vec![vec![0.5, 0.5], vec![0.5, 0.5]], 0);
        assert_eq!(decode(&scorer), Vec::<String>::new());
    }

    #[test]
    fn test_single_position_takes_initial_argmax() {
        let scorer = FixedScorer::new(vec![0.3, 0.7], vec![vec![0.5, 0.5], vec![0.5, 0.5]], 1);
        assert_eq!(decode(&scorer), vec!["b"]);
    }

    #[test]
    fn test_decode_follows_best_chain() {
        // a→a domina: o caminho inteiro fica em a
        let scorer = FixedScorer::new(vec![0.6, 0.4], vec![vec![0.9, 0.1], vec![0.2, 0.8]], 3);
        assert_eq!(decode(&scorer), vec!["a", "a", "a"]);
    }

    #[test]
    fn test_ties_resolve_to_first_label() {
        let scorer = FixedScorer::new(vec![0.5, 0.5], vec![vec![0.5, 0.5], vec![0.5, 0.5]], 2);
        assert_eq!(decode(&scorer), vec!["a", "a"]);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let scorer = FixedScorer::new(vec![0.5, 0.5], vec![vec![0.4, 0.6], vec![0.7, 0.3]], 4);
        assert_eq!(decode(&scorer), decode(&scorer));
    }

    #[test]
    fn test_older_index_rewrites_previous_column() {
        // sem older: cadeia toda em a
        let plain = FixedScorer::new(vec![1.0, 0.1], vec![vec![1.0, 0.1], vec![0.1, 0.1]], 3);
        assert_eq!(decode(&plain), vec!["a", "a", "a"]);

        // com older apontando para b, o backpointer da coluna do meio é
        // regravado e a reconstrução desvia a cabeça do caminho para b
        let mut rewriting = FixedScorer::new(vec![1.0, 0.1], vec![vec![1.0, 0.1], vec![0.1, 0.1]], 3);
        rewriting.older = Some(1);
        assert_eq!(decode(&rewriting), vec!["b", "a", "a"]);
    }

    #[test]
    #[should_panic(expected = "dead-ends")]
    fn test_all_zero_candidates_panic() {
        let scorer = FixedScorer::new(vec![0.5, 0.5], vec![vec![0.0, 0.0], vec![0.0, 0.0]], 2);
        decode(&scorer);
    }
}
