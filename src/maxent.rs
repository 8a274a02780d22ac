//! # Classificador MaxEnt (Regressão Logística Multinomial)
//!
//! Implementação discriminativa do [`FeatureScorer`]: aprende pesos
//! (feature, rótulo) por gradiente descendente estocástico com
//! regularização L2 e devolve o posterior por softmax. As features são
//! indicadoras `nome=valor` derivadas dos cinco campos de
//! [`MemmFeatures`], mais um viés por rótulo.
//!
//! O conjunto de rótulos de classe vem dos exemplos de treino: um rótulo
//! nunca observado tem posterior zero, e o chamador é quem garante que o
//! corpus de treino cobre os rótulos que a decodificação vai pedir.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::memm::{FeatureScorer, LabelDistribution, MemmFeatures};

/// Feature de viés presente em toda amostra.
const BIAS_FEATURE: &str = "bias";

/// Classificador log-linear sobre features esparsas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxentClassifier {
    /// (feature, rótulo) → peso; pesos ~zero são podados.
    weights: HashMap<(String, String), f64>,
    /// Rótulos de classe vistos no treino, ordenados.
    labels: Vec<String>,
}

impl MaxentClassifier {
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
            labels: Vec::new(),
        }
    }

    /// Treina por SGD sobre os exemplos, na ordem dada.
    ///
    /// * `examples` — pares (features, rótulo-ouro), cf.
    ///   [`crate::memm::training_examples`];
    /// * `epochs` — passadas completas pelos exemplos;
    /// * `learning_rate` — tamanho do passo do gradiente;
    /// * `l2` — fator de regularização dos pesos.
    pub fn train(
        &mut self,
        examples: &[(MemmFeatures, String)],
        epochs: usize,
        learning_rate: f64,
        l2: f64,
    ) {
        if examples.is_empty() {
            return;
        }

        let mut label_set = HashSet::new();
        for (_, label) in examples {
            label_set.insert(label.clone());
        }
        self.labels = label_set.into_iter().collect();
        self.labels.sort();

        for epoch in 0..epochs {
            let mut correct = 0usize;
            for (features, gold) in examples {
                let names = feature_names(features);
                let probs = softmax(&self.scores(&names));

                if let Some(best) = argmax(&probs) {
                    if &self.labels[best] == gold {
                        correct += 1;
                    }
                }

                for (label_idx, label) in self.labels.iter().enumerate() {
                    let indicator = if label == gold { 1.0 } else { 0.0 };
                    let error = indicator - probs[label_idx];
                    if error.abs() <= 1e-6 {
                        continue;
                    }
                    for name in &names {
                        let key = (name.clone(), label.clone());
                        let current = self.weights.get(&key).copied().unwrap_or(0.0);
                        let updated = current + learning_rate * (error - l2 * current);
                        // poda de pesos ~zero mantém a tabela esparsa
                        if updated.abs() > 1e-9 {
                            self.weights.insert(key, updated);
                        } else {
                            self.weights.remove(&key);
                        }
                    }
                }
            }
            if epoch % 5 == 0 {
                log::debug!(
                    "maxent epoch {epoch}: accuracy {:.2}%",
                    correct as f64 / examples.len() as f64 * 100.0
                );
            }
        }
    }

    /// Rótulos de classe, em ordem lexicográfica.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Score log-linear de cada rótulo para as features ativas.
    fn scores(&self, names: &[String]) -> Vec<f64> {
        self.labels
            .iter()
            .map(|label| {
                names
                    .iter()
                    .filter_map(|name| self.weights.get(&(name.clone(), label.clone())))
                    .sum()
            })
            .collect()
    }
}

impl Default for MaxentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureScorer for MaxentClassifier {
    /// Posterior P(rótulo | features) por softmax sobre os scores.
    fn posterior(&self, features: &MemmFeatures) -> LabelDistribution {
        let names = feature_names(features);
        let probs = softmax(&self.scores(&names));
        let mut dist = LabelDistribution::new();
        for (label, prob) in self.labels.iter().zip(probs) {
            dist.set(label.clone(), prob);
        }
        dist
    }
}

/// Features indicadoras ativas de uma amostra: `nome=valor` para os cinco
/// campos, mais o viés.
fn feature_names(features: &MemmFeatures) -> Vec<String> {
    let mut names: Vec<String> = features
        .pairs()
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    names.push(BIAS_FEATURE.to_string());
    names
}

/// Softmax com subtração do máximo para estabilidade numérica.
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max_score).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}
