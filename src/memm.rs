//! # MEMM — Decodificação Guiada por Classificador
//!
//! No Maximum-Entropy Markov Model as tabelas fixas de transição e
//! emissão dão lugar a um único posterior P(rótulo | features) fornecido
//! por um classificador ([`FeatureScorer`]). As features de uma transição
//! cobrem a palavra e a etiqueta POS correntes, as da posição anterior e
//! o rótulo NER do passo anterior; na posição 0 os campos de contexto
//! recebem o sentinela [`INIT_MARKER`].
//!
//! O posterior já condiciona na palavra corrente, então não existe
//! consulta de emissão separada. O classificador é consultado por
//! transição candidata, sem cache — O(n·m²) chamadas por sequência; um
//! cache por (posição, rótulo anterior) reduziria a O(n·m).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::corpus::Sentence;
use crate::viterbi::{decode, LatticeScorer, StepScore};

/// Sentinela dos campos de contexto na primeira posição da sentença.
pub const INIT_MARKER: &str = "init";

/// Rótulos do decodificador MEMM, na ordem fixa de declaração.
pub const MEMM_LABELS: [&str; 5] = ["O", "ORG", "PER", "LOC", "MISC"];

/// Features de uma transição: cinco campos string de contrato fixo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemmFeatures {
    pub curr_word: String,
    pub curr_pos: String,
    pub prev_word: String,
    pub prev_pos: String,
    pub prev_ner: String,
}

impl MemmFeatures {
    pub fn new(
        curr_word: impl Into<String>,
        curr_pos: impl Into<String>,
        prev_word: impl Into<String>,
        prev_pos: impl Into<String>,
        prev_ner: impl Into<String>,
    ) -> Self {
        Self {
            curr_word: curr_word.into(),
            curr_pos: curr_pos.into(),
            prev_word: prev_word.into(),
            prev_pos: prev_pos.into(),
            prev_ner: prev_ner.into(),
        }
    }

    /// Features da primeira posição: contexto preenchido com o sentinela.
    pub fn sentence_initial(curr_word: impl Into<String>, curr_pos: impl Into<String>) -> Self {
        Self::new(curr_word, curr_pos, INIT_MARKER, INIT_MARKER, INIT_MARKER)
    }

    /// Visão `(nome, valor)` dos cinco campos, para classificadores que
    /// constroem features indicadoras `nome=valor`.
    pub fn pairs(&self) -> [(&'static str, &str); 5] {
        [
            ("curr_word", &self.curr_word),
            ("curr_pos", &self.curr_pos),
            ("prev_word", &self.prev_word),
            ("prev_pos", &self.prev_pos),
            ("prev_ner", &self.prev_ner),
        ]
    }
}

/// Distribuição discreta rótulo → probabilidade devolvida por um
/// [`FeatureScorer`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelDistribution {
    probs: HashMap<String, f64>,
}

impl LabelDistribution {
    pub fn new() -> Self {
        Self {
            probs: HashMap::new(),
        }
    }

    pub fn set(&mut self, label: impl Into<String>, prob: f64) {
        self.probs.insert(label.into(), prob);
    }

    /// Probabilidade do rótulo; zero para rótulos fora da distribuição.
    pub fn probability(&self, label: &str) -> f64 {
        self.probs.get(label).copied().unwrap_or(0.0)
    }
}

/// Fonte do posterior P(rótulo | features) da decodificação MEMM.
///
/// O decodificador depende apenas desta interface; em teste um scorer com
/// distribuições fixas substitui o classificador treinado.
pub trait FeatureScorer {
    fn posterior(&self, features: &MemmFeatures) -> LabelDistribution;
}

/// Tagger MEMM: decodificação de Viterbi guiada por um classificador.
#[derive(Debug, Clone)]
pub struct MemmTagger<S> {
    scorer: S,
}

impl<S: FeatureScorer> MemmTagger<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Decodifica uma sentença a partir de tokens e etiquetas POS
    /// alinhados, sobre o conjunto fixo [`MEMM_LABELS`].
    ///
    /// # Panics
    ///
    /// Entra em pânico se `tokens` e `pos` tiverem comprimentos
    /// diferentes.
    pub fn predict(&self, tokens: &[String], pos: &[String]) -> Vec<String> {
        assert_eq!(
            tokens.len(),
            pos.len(),
            "tokens and POS tags must have the same length"
        );
        let labels: Vec<String> = MEMM_LABELS.iter().map(|l| l.to_string()).collect();
        decode(&MemmLattice {
            scorer: &self.scorer,
            tokens,
            pos,
            labels,
        })
    }
}

/// Visão de treliça de uma sentença sob o posterior do classificador.
struct MemmLattice<'a, S> {
    scorer: &'a S,
    tokens: &'a [String],
    pos: &'a [String],
    labels: Vec<String>,
}

impl<S: FeatureScorer> LatticeScorer for MemmLattice<'_, S> {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn initial(&self, state: usize) -> f64 {
        let features = MemmFeatures::sentence_initial(&self.tokens[0], &self.pos[0]);
        self.scorer
            .posterior(&features)
            .probability(&self.labels[state])
    }

    fn step(&self, position: usize, prev: usize, state: usize) -> StepScore {
        let features = MemmFeatures::new(
            &self.tokens[position],
            &self.pos[position],
            &self.tokens[position - 1],
            &self.pos[position - 1],
            &self.labels[prev],
        );
        StepScore {
            prob: self
                .scorer
                .posterior(&features)
                .probability(&self.labels[state]),
            older: None,
        }
    }
}

/// Extrai os pares (features, rótulo-alvo) de treino do classificador,
/// uma amostra por token do corpus.
pub fn training_examples(corpus: &[Sentence]) -> Vec<(MemmFeatures, String)> {
    let mut examples = Vec::new();
    for sentence in corpus {
        for i in 0..sentence.len() {
            let features = if i == 0 {
                MemmFeatures::sentence_initial(&sentence.tokens[0], &sentence.pos[0])
            } else {
                MemmFeatures::new(
                    &sentence.tokens[i],
                    &sentence.pos[i],
                    &sentence.tokens[i - 1],
                    &sentence.pos[i - 1],
                    &sentence.labels[i - 1],
                )
            };
            examples.push((features, sentence.labels[i].clone()));
        }
    }
    examples
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Scorer fixo que registra cada consulta: "Shaun" puxa PER, o resto
    /// puxa O; todos os rótulos recebem massa estritamente positiva.
    struct FakeScorer {
        calls: RefCell<Vec<MemmFeatures>>,
    }

    impl FakeScorer {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl FeatureScorer for FakeScorer {
        fn posterior(&self, features: &MemmFeatures) -> LabelDistribution {
            self.calls.borrow_mut().push(features.clone());
            let mut dist = LabelDistribution::new();
            for label in MEMM_LABELS {
                dist.set(label, 0.03);
            }
            if features.curr_word == "Shaun" {
                dist.set("PER", 0.76);
                dist.set("O", 0.15);
            } else {
                dist.set("O", 0.76);
                dist.set("PER", 0.15);
            }
            dist
        }
    }

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_memm_decodes_posterior_chain() {
        let tagger = MemmTagger::new(FakeScorer::new());
        let path = tagger.predict(&strings(&["Shaun", "scored"]), &strings(&["NNP", "VBD"]));
        assert_eq!(path, vec!["PER", "O"]);
    }

    #[test]
    fn test_first_position_features_carry_init_sentinel() {
        let tagger = MemmTagger::new(FakeScorer::new());
        tagger.predict(&strings(&["Shaun", "scored"]), &strings(&["NNP", "VBD"]));

        let calls = tagger.scorer().calls.borrow();
        let first = &calls[0];
        assert_eq!(first.curr_word, "Shaun");
        assert_eq!(first.curr_pos, "NNP");
        assert_eq!(first.prev_word, INIT_MARKER);
        assert_eq!(first.prev_pos, INIT_MARKER);
        assert_eq!(first.prev_ner, INIT_MARKER);
        // a inicialização consulta uma vez por estado, com as mesmas features
        for call in calls.iter().take(MEMM_LABELS.len()) {
            assert_eq!(call, first);
        }
    }

    #[test]
    fn test_scorer_is_consulted_per_candidate_transition() {
        let tagger = MemmTagger::new(FakeScorer::new());
        tagger.predict(&strings(&["Shaun", "scored"]), &strings(&["NNP", "VBD"]));
        // 5 consultas na inicialização + 25 por posição seguinte
        let m = MEMM_LABELS.len();
        assert_eq!(tagger.scorer().calls.borrow().len(), m + m * m);
    }

    #[test]
    fn test_step_features_carry_previous_label() {
        let tagger = MemmTagger::new(FakeScorer::new());
        tagger.predict(&strings(&["Shaun", "scored"]), &strings(&["NNP", "VBD"]));

        let calls = tagger.scorer().calls.borrow();
        let step_calls = &calls[MEMM_LABELS.len()..];
        assert!(step_calls
            .iter()
            .all(|f| f.curr_word == "scored" && f.prev_word == "Shaun" && f.prev_pos == "NNP"));
        // cada rótulo anterior candidato aparece nas consultas do passo
        for label in MEMM_LABELS {
            assert!(step_calls.iter().any(|f| f.prev_ner == label));
        }
    }

    #[test]
    fn test_empty_sentence() {
        let tagger = MemmTagger::new(FakeScorer::new());
        assert_eq!(tagger.predict(&[], &[]), Vec::<String>::new());
        assert!(tagger.scorer().calls.borrow().is_empty());
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_mismatched_columns_panic() {
        let tagger = MemmTagger::new(FakeScorer::new());
        tagger.predict(&strings(&["Shaun", "scored"]), &strings(&["NNP"]));
    }

    #[test]
    fn test_training_examples_extraction() {
        let corpus = vec![Sentence {
            tokens: strings(&["Shaun", "scored"]),
            pos: strings(&["NNP", "VBD"]),
            labels: strings(&["PER", "O"]),
        }];
        let examples = training_examples(&corpus);
        assert_eq!(examples.len(), 2);

        let (first, target) = &examples[0];
        assert_eq!(first, &MemmFeatures::sentence_initial("Shaun", "NNP"));
        assert_eq!(target, "PER");

        let (second, target) = &examples[1];
        assert_eq!(second.curr_word, "scored");
        assert_eq!(second.prev_word, "Shaun");
        assert_eq!(second.prev_ner, "PER");
        assert_eq!(target, "O");
    }
}
