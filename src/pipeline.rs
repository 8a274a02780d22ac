//! # Pipeline de Etiquetagem — Treino e Decodificação em Lote
//!
//! Treina todos os modelos a partir de um único corpus anotado e despacha
//! a predição pelo modo de algoritmo escolhido. O corpus de treino é
//! convertido para rótulos curtos antes de qualquer treinamento — os
//! modelos operam sobre {O, ORG, PER, LOC, MISC} — e o baseline treina
//! sobre uma cópia adicional com palavras raras mascaradas, para popular
//! o balde de desconhecidos.
//!
//! Depois do treino os modelos são imutáveis; sentenças são decodificadas
//! de forma independente, e a predição do corpus de teste é paralelizada
//! com rayon sem qualquer lock.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::baseline::MajorityTagger;
use crate::corpus::{mask_rare_words, strip_bio, Sentence};
use crate::hmm::HmmTagger;
use crate::interpolation::InterpolationWeights;
use crate::maxent::MaxentClassifier;
use crate::memm::{training_examples, MemmTagger};
use crate::ngram::DEFAULT_SMOOTHING;
use crate::submission::Submission;

/// Algoritmo de decodificação usado na predição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmMode {
    /// Transições de n-gramas de rótulos e emissões por palavra,
    /// decodificadas com Viterbi.
    Hmm,
    /// Posterior do classificador MaxEnt por transição, decodificado com
    /// Viterbi.
    Memm,
    /// Rótulo majoritário por palavra, sem contexto.
    Baseline,
}

impl Default for AlgorithmMode {
    fn default() -> Self {
        AlgorithmMode::Hmm
    }
}

/// Hiperparâmetros de treino do pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Constante de suavização add-k das tabelas de contagem.
    pub smoothing: f64,
    /// Liga a interpolação de trigramas nas transições do HMM.
    pub interpolation: bool,
    /// Pesos da interpolação.
    pub weights: InterpolationWeights,
    /// Frequência mínima para uma palavra escapar do mascaramento UNK.
    pub rare_word_threshold: usize,
    /// Épocas de SGD do classificador MaxEnt.
    pub maxent_epochs: usize,
    /// Taxa de aprendizado do SGD.
    pub maxent_learning_rate: f64,
    /// Regularização L2 do SGD.
    pub maxent_l2: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            interpolation: true,
            weights: InterpolationWeights::default(),
            rare_word_threshold: 2,
            maxent_epochs: 10,
            maxent_learning_rate: 0.1,
            maxent_l2: 0.001,
        }
    }
}

/// Pipeline treinado: um modelo por modo de algoritmo.
pub struct TaggingPipeline {
    pub hmm: HmmTagger,
    pub memm: MemmTagger<MaxentClassifier>,
    pub baseline: MajorityTagger,
}

impl TaggingPipeline {
    /// Treina os três modelos a partir do corpus anotado. Os rótulos
    /// podem vir com ou sem prefixos BIO: os prefixos são removidos aqui.
    pub fn train(corpus: &[Sentence], config: PipelineConfig) -> Self {
        log::info!("training pipeline on {} sentences", corpus.len());
        let stripped = strip_bio(corpus);

        let mut hmm = HmmTagger::with_options(config.smoothing, config.interpolation, config.weights);
        hmm.train(&stripped);

        let masked = mask_rare_words(&stripped, config.rare_word_threshold);
        let mut baseline = MajorityTagger::new();
        baseline.train(&masked);

        let examples = training_examples(&stripped);
        log::info!("training maxent on {} examples", examples.len());
        let mut classifier = MaxentClassifier::new();
        classifier.train(
            &examples,
            config.maxent_epochs,
            config.maxent_learning_rate,
            config.maxent_l2,
        );

        Self {
            hmm,
            memm: MemmTagger::new(classifier),
            baseline,
        }
    }

    /// Prediz os rótulos de uma sentença com o modo escolhido.
    pub fn predict(&self, mode: AlgorithmMode, sentence: &Sentence) -> Vec<String> {
        match mode {
            AlgorithmMode::Hmm => self.hmm.predict(&sentence.tokens),
            AlgorithmMode::Memm => self.memm.predict(&sentence.tokens, &sentence.pos),
            AlgorithmMode::Baseline => self.baseline.predict(&sentence.tokens),
        }
    }

    /// Decodifica um corpus inteiro em paralelo, preservando a ordem das
    /// sentenças.
    pub fn predict_corpus(&self, mode: AlgorithmMode, corpus: &[Sentence]) -> Vec<Vec<String>> {
        corpus
            .par_iter()
            .map(|sentence| self.predict(mode, sentence))
            .collect()
    }

    /// Predição e formatação de submissão para o corpus de teste.
    pub fn submission(&self, mode: AlgorithmMode, corpus: &[Sentence]) -> Submission {
        Submission::from_predictions(&self.predict_corpus(mode, corpus))
    }
}
