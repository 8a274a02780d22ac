//! # Modelos de N-gramas de Rótulos com Suavização Add-k
//!
//! Tabelas de probabilidade sobre sequências de rótulos, construídas por
//! contagem com suavização aditiva:
//!
//! - a **primeira** observação de um evento registra a contagem `1 + k`;
//! - cada observação seguinte soma `1`;
//! - ao final, cada contexto é normalizado pela soma das suas contagens.
//!
//! As janelas de bigrama e trigrama deslizam dentro de cada sequência e
//! nunca cruzam o limite entre sequenças vizinhas.
//!
//! A consulta devolve `Option<f64>`: evento nunca visto resulta em `None`,
//! nunca em zero silencioso — quem decide a política de back-off é o
//! chamador (ver [`crate::interpolation`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Constante de suavização aditiva padrão.
pub const DEFAULT_SMOOTHING: f64 = 0.01;

/// Distribuição de unigramas: P(rótulo) sobre o corpus inteiro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnigramModel {
    probs: HashMap<String, f64>,
    k: f64,
}

impl UnigramModel {
    pub fn new() -> Self {
        Self::with_smoothing(DEFAULT_SMOOTHING)
    }

    pub fn with_smoothing(k: f64) -> Self {
        Self {
            probs: HashMap::new(),
            k,
        }
    }

    /// Conta os rótulos de todas as sequências e normaliza pelo total.
    pub fn train<'a, I>(&mut self, sequences: I)
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut counts: HashMap<String, f64> = HashMap::new();
        for sequence in sequences {
            for label in sequence {
                match counts.get_mut(label) {
                    Some(count) => *count += 1.0,
                    None => {
                        counts.insert(label.clone(), 1.0 + self.k);
                    }
                }
            }
        }
        let total: f64 = counts.values().sum();
        self.probs = counts
            .into_iter()
            .map(|(label, count)| (label, count / total))
            .collect();
    }

    /// P(rótulo), ou `None` para rótulos fora do vocabulário.
    pub fn probability(&self, label: &str) -> Option<f64> {
        self.probs.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }
}

impl Default for UnigramModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Tabela de bigramas: P(próximo | anterior), com chaves `(anterior, próximo)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigramModel {
    probs: HashMap<(String, String), f64>,
    k: f64,
}

impl BigramModel {
    pub fn new() -> Self {
        Self::with_smoothing(DEFAULT_SMOOTHING)
    }

    pub fn with_smoothing(k: f64) -> Self {
        Self {
            probs: HashMap::new(),
            k,
        }
    }

    /// Janela deslizante de tamanho 2 sobre cada sequência; ao final, cada
    /// contexto `anterior` é normalizado pela soma das suas contagens.
    pub fn train<'a, I>(&mut self, sequences: I)
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut counts: HashMap<(String, String), f64> = HashMap::new();
        for sequence in sequences {
            for window in sequence.windows(2) {
                let key = (window[0].clone(), window[1].clone());
                match counts.get_mut(&key) {
                    Some(count) => *count += 1.0,
                    None => {
                        counts.insert(key, 1.0 + self.k);
                    }
                }
            }
        }

        let mut context_totals: HashMap<String, f64> = HashMap::new();
        for ((prev, _), count) in &counts {
            *context_totals.entry(prev.clone()).or_insert(0.0) += *count;
        }
        self.probs = counts
            .into_iter()
            .map(|((prev, next), count)| {
                let total = context_totals[&prev];
                ((prev, next), count / total)
            })
            .collect();
    }

    /// P(próximo | anterior), ou `None` se o par nunca foi observado.
    pub fn probability(&self, prev: &str, next: &str) -> Option<f64> {
        self.probs.get(&(prev.to_string(), next.to_string())).copied()
    }
}

impl Default for BigramModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Tabela de trigramas: P(terceiro | primeiro, segundo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrigramModel {
    probs: HashMap<(String, String, String), f64>,
    k: f64,
}

impl TrigramModel {
    pub fn new() -> Self {
        Self::with_smoothing(DEFAULT_SMOOTHING)
    }

    pub fn with_smoothing(k: f64) -> Self {
        Self {
            probs: HashMap::new(),
            k,
        }
    }

    /// Janela deslizante de tamanho 3; o contexto de normalização é o par
    /// ordenado `(primeiro, segundo)`.
    pub fn train<'a, I>(&mut self, sequences: I)
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut counts: HashMap<(String, String, String), f64> = HashMap::new();
        for sequence in sequences {
            for window in sequence.windows(3) {
                let key = (window[0].clone(), window[1].clone(), window[2].clone());
                match counts.get_mut(&key) {
                    Some(count) => *count += 1.0,
                    None => {
                        counts.insert(key, 1.0 + self.k);
                    }
                }
            }
        }

        let mut context_totals: HashMap<(String, String), f64> = HashMap::new();
        for ((first, second, _), count) in &counts {
            *context_totals
                .entry((first.clone(), second.clone()))
                .or_insert(0.0) += *count;
        }
        self.probs = counts
            .into_iter()
            .map(|((first, second, third), count)| {
                let total = context_totals[&(first.clone(), second.clone())];
                ((first, second, third), count / total)
            })
            .collect();
    }

    /// P(terceiro | primeiro, segundo), ou `None` se o trigrama é inédito.
    pub fn probability(&self, first: &str, second: &str, third: &str) -> Option<f64> {
        self.probs
            .get(&(first.to_string(), second.to_string(), third.to_string()))
            .copied()
    }
}

impl Default for TrigramModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unigram_add_k_counts() {
        let mut model = UnigramModel::new();
        let labels = seq(&["O", "O", "PER"]);
        model.train([labels.as_slice()]);
        // primeira observação vale 1.01, a segunda soma 1; total 3.02
        assert!((model.probability("O").unwrap() - 2.01 / 3.02).abs() < 1e-12);
        assert!((model.probability("PER").unwrap() - 1.01 / 3.02).abs() < 1e-12);
        assert_eq!(model.probability("LOC"), None);
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_unigram_distribution_sums_to_one() {
        let mut model = UnigramModel::new();
        let labels = seq(&["O", "PER", "O", "LOC", "O"]);
        model.train([labels.as_slice()]);
        let sum: f64 = ["O", "PER", "LOC"]
            .iter()
            .map(|l| model.probability(l).unwrap())
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bigram_normalizes_per_context() {
        let mut model = BigramModel::new();
        let labels = seq(&["A", "B", "A", "B", "A", "C"]);
        model.train([labels.as_slice()]);
        // contexto A: (A,B) 2x => 2.01, (A,C) 1x => 1.01, total 3.02
        assert!((model.probability("A", "B").unwrap() - 2.01 / 3.02).abs() < 1e-12);
        assert!((model.probability("A", "C").unwrap() - 1.01 / 3.02).abs() < 1e-12);
        assert!((model.probability("B", "A").unwrap() - 1.0).abs() < 1e-12);
        let sum = model.probability("A", "B").unwrap() + model.probability("A", "C").unwrap();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(model.probability("B", "C"), None);
        assert_eq!(model.probability("C", "A"), None);
    }

    #[test]
    fn test_bigram_windows_stay_within_sequences() {
        let mut model = BigramModel::new();
        let s1 = seq(&["A", "B"]);
        let s2 = seq(&["C", "D"]);
        model.train([s1.as_slice(), s2.as_slice()]);
        assert!(model.probability("A", "B").is_some());
        assert!(model.probability("C", "D").is_some());
        // o par (B, C) atravessa o limite entre sequências e não existe
        assert_eq!(model.probability("B", "C"), None);
    }

    #[test]
    fn test_trigram_normalizes_per_context_pair() {
        let mut model = TrigramModel::new();
        let s1 = seq(&["A", "B", "C"]);
        let s2 = seq(&["A", "B", "D"]);
        model.train([s1.as_slice(), s2.as_slice()]);
        assert!((model.probability("A", "B", "C").unwrap() - 0.5).abs() < 1e-12);
        assert!((model.probability("A", "B", "D").unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(model.probability("B", "C", "A"), None);
    }

    #[test]
    fn test_trigram_needs_three_positions() {
        let mut model = TrigramModel::new();
        let short = seq(&["A", "B"]);
        model.train([short.as_slice()]);
        assert_eq!(model.probability("A", "B", "A"), None);
    }
}
