//! # Modelo de Emissão — P(palavra | rótulo)
//!
//! Tabela de contagens suavizadas (add-k) indexada por `(rótulo, palavra)`,
//! com dois totais por rótulo que servem a consultas diferentes:
//!
//! - **massa do rótulo**: soma das contagens suavizadas do rótulo, igual a
//!   `total bruto + k · |palavras distintas|` — denominador da emissão;
//! - **total do rótulo**: `k + ocorrências brutas` — numerador da
//!   probabilidade a priori do rótulo.
//!
//! Pares `(rótulo, palavra)` nunca vistos carregam a massa mínima `k` no
//! nível da tabela ([`EmissionModel::smoothed_count`]); na consulta usada
//! pela decodificação ([`EmissionModel::emission`]) recebem o piso fixo
//! [`EMISSION_FLOOR`]. O piso mantém a treliça estritamente positiva e é
//! deliberadamente distinto da priori zero de um rótulo inexistente.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::corpus::Sentence;
use crate::ngram::DEFAULT_SMOOTHING;

/// Piso de probabilidade de emissão para pares nunca vistos.
pub const EMISSION_FLOOR: f64 = 1e-9;

/// Contagens de emissão e totais por rótulo de um corpus anotado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionModel {
    /// (rótulo, palavra) → contagem suavizada.
    counts: HashMap<(String, String), f64>,
    /// rótulo → k + ocorrências brutas.
    label_totals: HashMap<String, f64>,
    /// rótulo → soma das contagens suavizadas.
    label_masses: HashMap<String, f64>,
    /// Soma de todos os totais de rótulo.
    prior_total: f64,
    /// Rótulos conhecidos, em ordem lexicográfica.
    labels: Vec<String>,
    k: f64,
}

impl EmissionModel {
    pub fn new() -> Self {
        Self::with_smoothing(DEFAULT_SMOOTHING)
    }

    pub fn with_smoothing(k: f64) -> Self {
        Self {
            counts: HashMap::new(),
            label_totals: HashMap::new(),
            label_masses: HashMap::new(),
            prior_total: 0.0,
            labels: Vec::new(),
            k,
        }
    }

    /// Percorre todos os pares (token, rótulo) do corpus.
    ///
    /// Um rótulo novo inicia seu total em `k` e um par novo inicia sua
    /// contagem em `k`; ambos somam 1 em seguida — uma palavra vista uma
    /// única vez sob um rótulo carrega portanto a contagem `k + 1`.
    pub fn train(&mut self, corpus: &[Sentence]) {
        self.counts.clear();
        self.label_totals.clear();

        for sentence in corpus {
            for (token, label) in sentence.tokens.iter().zip(&sentence.labels) {
                let key = (label.clone(), token.clone());
                *self.counts.entry(key).or_insert(self.k) += 1.0;
                *self.label_totals.entry(label.clone()).or_insert(self.k) += 1.0;
            }
        }

        self.label_masses.clear();
        for ((label, _), count) in &self.counts {
            *self.label_masses.entry(label.clone()).or_insert(0.0) += *count;
        }
        self.prior_total = self.label_totals.values().sum();

        self.labels = self.label_totals.keys().cloned().collect();
        self.labels.sort();
        log::info!(
            "emission model: {} labels, {} (label, word) pairs",
            self.labels.len(),
            self.counts.len()
        );
    }

    /// P(palavra | rótulo) para a decodificação: contagem suavizada sobre
    /// a massa do rótulo se o par foi visto; [`EMISSION_FLOOR`] se não.
    pub fn emission(&self, word: &str, label: &str) -> f64 {
        match self.counts.get(&(label.to_string(), word.to_string())) {
            Some(&count) => count / self.label_masses[label],
            None => EMISSION_FLOOR,
        }
    }

    /// Contagem suavizada no nível da tabela: a contagem armazenada, ou a
    /// massa mínima `k` para pares nunca vistos.
    pub fn smoothed_count(&self, label: &str, word: &str) -> f64 {
        self.counts
            .get(&(label.to_string(), word.to_string()))
            .copied()
            .unwrap_or(self.k)
    }

    /// Soma das contagens suavizadas do rótulo, ou `None` para rótulos
    /// desconhecidos.
    pub fn label_mass(&self, label: &str) -> Option<f64> {
        self.label_masses.get(label).copied()
    }

    /// Probabilidade a priori do rótulo: total do rótulo sobre a soma de
    /// todos os totais. Rótulos desconhecidos têm priori zero.
    pub fn prior(&self, label: &str) -> f64 {
        if self.prior_total == 0.0 {
            return 0.0;
        }
        self.label_totals
            .get(label)
            .map_or(0.0, |total| total / self.prior_total)
    }

    /// Rótulos vistos no treino, em ordem lexicográfica.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
