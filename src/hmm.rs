//! # Tagger HMM com Transições de Bigrama ou Trigrama Interpolado
//!
//! Modelo generativo clássico sobre rótulos curtos (sem prefixos BIO):
//!
//! 1. **priori**: P(rótulo), dos totais do modelo de emissão;
//! 2. **emissão**: P(palavra | rótulo), com piso para pares nunca vistos;
//! 3. **transição**: bigrama puro ou — a partir da terceira posição —
//!    máximo sobre o rótulo mais antigo da interpolação de trigramas.
//!
//! A decodificação usa o motor genérico de [`crate::viterbi`]; os pisos
//! de probabilidade garantem que a treliça nunca zera. No modo
//! interpolado o scorer devolve o rótulo mais antigo vencedor em
//! [`StepScore::older`], ativando a reescrita de backpointers descrita no
//! módulo do motor.

use serde::{Deserialize, Serialize};

use crate::corpus::Sentence;
use crate::emission::EmissionModel;
use crate::interpolation::{interpolate, InterpolationWeights};
use crate::ngram::{BigramModel, TrigramModel, UnigramModel, DEFAULT_SMOOTHING};
use crate::viterbi::{decode, LatticeScorer, StepScore};

/// Piso de probabilidade para bigramas de rótulos nunca observados.
const TRANSITION_FLOOR: f64 = 1e-9;

/// Tagger HMM treinado sobre um corpus anotado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HmmTagger {
    emission: EmissionModel,
    unigram: UnigramModel,
    bigram: BigramModel,
    trigram: TrigramModel,
    weights: InterpolationWeights,
    interpolation: bool,
}

impl HmmTagger {
    /// Tagger com interpolação de trigramas e pesos padrão.
    pub fn new() -> Self {
        Self::with_options(DEFAULT_SMOOTHING, true, InterpolationWeights::default())
    }

    /// Tagger restrito a transições de bigrama.
    pub fn bigram_only() -> Self {
        Self::with_options(DEFAULT_SMOOTHING, false, InterpolationWeights::default())
    }

    /// Tagger interpolado com pesos customizados.
    pub fn with_weights(weights: InterpolationWeights) -> Self {
        Self::with_options(DEFAULT_SMOOTHING, true, weights)
    }

    pub fn with_options(smoothing: f64, interpolation: bool, weights: InterpolationWeights) -> Self {
        Self {
            emission: EmissionModel::with_smoothing(smoothing),
            unigram: UnigramModel::with_smoothing(smoothing),
            bigram: BigramModel::with_smoothing(smoothing),
            trigram: TrigramModel::with_smoothing(smoothing),
            weights,
            interpolation,
        }
    }

    /// Treina a emissão e as três tabelas de n-gramas sobre a coluna de
    /// rótulos do corpus.
    pub fn train(&mut self, corpus: &[Sentence]) {
        self.emission.train(corpus);
        self.unigram.train(corpus.iter().map(|s| s.labels.as_slice()));
        self.bigram.train(corpus.iter().map(|s| s.labels.as_slice()));
        self.trigram.train(corpus.iter().map(|s| s.labels.as_slice()));
    }

    /// Decodifica a sequência de tokens, um rótulo por token.
    pub fn predict(&self, tokens: &[String]) -> Vec<String> {
        decode(&HmmLattice {
            model: self,
            tokens,
        })
    }

    /// Rótulos vistos no treino, em ordem lexicográfica.
    pub fn labels(&self) -> &[String] {
        self.emission.labels()
    }
}

impl Default for HmmTagger {
    fn default() -> Self {
        Self::new()
    }
}

/// Visão de treliça de um HMM sobre uma sequência concreta.
struct HmmLattice<'a> {
    model: &'a HmmTagger,
    tokens: &'a [String],
}

impl LatticeScorer for HmmLattice<'_> {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn labels(&self) -> &[String] {
        self.model.emission.labels()
    }

    fn initial(&self, state: usize) -> f64 {
        let label = &self.model.emission.labels()[state];
        self.model.emission.prior(label) * self.model.emission.emission(&self.tokens[0], label)
    }

    fn step(&self, position: usize, prev: usize, state: usize) -> StepScore {
        let labels = self.model.emission.labels();
        let label = &labels[state];
        let prev_label = &labels[prev];
        let lexical = self.model.emission.emission(&self.tokens[position], label);

        // as duas primeiras posições não têm contexto de trigrama
        if !self.model.interpolation || position < 2 {
            let transition = self
                .model
                .bigram
                .probability(prev_label, label)
                .unwrap_or(TRANSITION_FLOOR);
            return StepScore {
                prob: transition * lexical,
                older: None,
            };
        }

        // máximo sobre o rótulo mais antigo; empates ficam com o primeiro
        // maximizador na ordem de rótulos do modelo
        let mut best = 0.0f64;
        let mut best_older = 0usize;
        for (older, older_label) in labels.iter().enumerate() {
            let transition = interpolate(
                older_label,
                prev_label,
                label,
                &self.model.unigram,
                &self.model.bigram,
                &self.model.trigram,
                self.model.weights,
            );
            if transition > best {
                best = transition;
                best_older = older;
            }
        }
        StepScore {
            prob: best * lexical,
            older: Some(best_older),
        }
    }
}
