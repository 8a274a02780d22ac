//! # Tagger de Maioria por Palavra (Baseline)
//!
//! Modelo sem programação dinâmica: para cada palavra do treino guarda a
//! contagem bruta de cada rótulo e prediz o rótulo majoritário da palavra
//! exata. Palavras nunca vistas caem no balde reservado [`UNKNOWN_WORD`],
//! populado treinando sobre um corpus mascarado com
//! [`crate::corpus::mask_rare_words`]; se nem o balde existir, vale o
//! rótulo majoritário do corpus inteiro.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::corpus::{Sentence, OUTSIDE_LABEL, UNKNOWN_WORD};

/// Tagger de rótulo majoritário por palavra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorityTagger {
    /// palavra → (rótulo → contagem bruta).
    word_labels: HashMap<String, HashMap<String, u32>>,
    /// Rótulo majoritário do corpus, fallback final.
    majority: Option<String>,
}

impl MajorityTagger {
    pub fn new() -> Self {
        Self {
            word_labels: HashMap::new(),
            majority: None,
        }
    }

    /// Conta os pares (palavra, rótulo) do corpus, sem suavização.
    pub fn train(&mut self, corpus: &[Sentence]) {
        self.word_labels.clear();
        let mut label_totals: HashMap<String, u32> = HashMap::new();
        for sentence in corpus {
            for (token, label) in sentence.tokens.iter().zip(&sentence.labels) {
                *self
                    .word_labels
                    .entry(token.clone())
                    .or_default()
                    .entry(label.clone())
                    .or_insert(0) += 1;
                *label_totals.entry(label.clone()).or_insert(0) += 1;
            }
        }
        self.majority = majority_label(&label_totals);
        log::info!("majority tagger: {} distinct words", self.word_labels.len());
    }

    /// Rótulo majoritário de uma palavra. Palavra inédita cai no balde
    /// [`UNKNOWN_WORD`]; sem o balde, vale a maioria do corpus; um tagger
    /// nunca treinado responde o rótulo fora de entidade.
    pub fn predict_word(&self, word: &str) -> String {
        let bucket = self
            .word_labels
            .get(word)
            .or_else(|| self.word_labels.get(UNKNOWN_WORD));
        if let Some(counts) = bucket {
            if let Some(best) = majority_label(counts) {
                return best;
            }
        }
        self.majority
            .clone()
            .unwrap_or_else(|| OUTSIDE_LABEL.to_string())
    }

    /// Prediz cada token de forma independente, sem contexto.
    pub fn predict(&self, tokens: &[String]) -> Vec<String> {
        tokens.iter().map(|token| self.predict_word(token)).collect()
    }
}

impl Default for MajorityTagger {
    fn default() -> Self {
        Self::new()
    }
}

/// Rótulo de maior contagem; empates ficam com o lexicograficamente menor.
fn majority_label(counts: &HashMap<String, u32>) -> Option<String> {
    let mut labels: Vec<&String> = counts.keys().collect();
    labels.sort();
    let mut best: Option<&String> = None;
    for label in labels {
        match best {
            Some(current) if counts[current] >= counts[label] => {}
            _ => best = Some(label),
        }
    }
    best.cloned()
}
