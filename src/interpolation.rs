//! # Interpolação Linear com Back-off
//!
//! Combina as estimativas de unigrama, bigrama e trigrama em uma única
//! probabilidade de transição:
//!
//! $$ P(w_3 \mid w_1, w_2) = \lambda_1 P(w_3) + \lambda_2 P(w_3 \mid w_2) + \lambda_3 P(w_3 \mid w_1, w_2) $$
//!
//! A cascata para contextos ausentes é assimétrica de propósito — cada
//! ordem só participa se a ordem inferior existir:
//!
//! | caso                         | resultado                                  |
//! |------------------------------|--------------------------------------------|
//! | `w3` fora do vocabulário     | piso fixo [`OOV_FLOOR`]                    |
//! | bigrama `(w2, w3)` ausente   | unigrama puro, sem repesagem               |
//! | trigrama ausente             | `bi·(λ2+λ3) + uni·λ1`                      |
//! | todos presentes              | `bi·λ2 + tri·λ3 + uni·λ1`                  |
//!
//! Os pesos são validados na construção de [`InterpolationWeights`], então
//! nenhuma soma é conferida durante a decodificação.

use serde::{Deserialize, Serialize};

use crate::error::{NerError, Result};
use crate::ngram::{BigramModel, TrigramModel, UnigramModel};

/// Probabilidade atribuída a um rótulo fora do vocabulário de unigramas.
pub const OOV_FLOOR: f64 = 1e-8;

/// Tolerância numérica da validação da soma dos pesos.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Pesos $(\lambda_1, \lambda_2, \lambda_3)$ da interpolação.
///
/// Os campos são privados: toda instância passou pela validação de
/// [`InterpolationWeights::new`] e soma 1 dentro da tolerância.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationWeights {
    unigram: f64,
    bigram: f64,
    trigram: f64,
}

impl InterpolationWeights {
    /// Cria pesos validados; soma fora de 1 é um erro de configuração
    /// rejeitado antes de qualquer decodificação.
    pub fn new(unigram: f64, bigram: f64, trigram: f64) -> Result<Self> {
        let sum = unigram + bigram + trigram;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(NerError::InvalidWeights { sum });
        }
        Ok(Self {
            unigram,
            bigram,
            trigram,
        })
    }

    pub fn unigram(&self) -> f64 {
        self.unigram
    }

    pub fn bigram(&self) -> f64 {
        self.bigram
    }

    pub fn trigram(&self) -> f64 {
        self.trigram
    }
}

impl Default for InterpolationWeights {
    /// Pesos padrão $(0.2, 0.3, 0.5)$.
    fn default() -> Self {
        Self {
            unigram: 0.2,
            bigram: 0.3,
            trigram: 0.5,
        }
    }
}

/// Probabilidade interpolada de `w3` dado o contexto ordenado `(w1, w2)`.
///
/// Segue a cascata descrita no módulo; em particular, quando o bigrama
/// `(w2, w3)` não existe o unigrama é devolvido sozinho.
pub fn interpolate(
    w1: &str,
    w2: &str,
    w3: &str,
    unigram: &UnigramModel,
    bigram: &BigramModel,
    trigram: &TrigramModel,
    weights: InterpolationWeights,
) -> f64 {
    let uni = match unigram.probability(w3) {
        Some(p) => p,
        None => return OOV_FLOOR,
    };
    let bi = match bigram.probability(w2, w3) {
        Some(p) => p,
        None => return uni,
    };
    match trigram.probability(w1, w2, w3) {
        Some(tri) => bi * weights.bigram + tri * weights.trigram + uni * weights.unigram,
        None => bi * (weights.bigram + weights.trigram) + uni * weights.unigram,
    }
}
