//! # ner-markov — Etiquetagem Estatística de Entidades Nomeadas
//!
//! Núcleo probabilístico de um etiquetador de entidades nomeadas (NER)
//! por sequência: modelos de n-gramas de rótulos com suavização add-k e
//! interpolação linear, um modelo de emissão P(palavra | rótulo), e um
//! decodificador de Viterbi genérico com dois regimes de pontuação — HMM
//! (generativo) e MEMM (discriminativo, guiado pelo posterior de um
//! classificador MaxEnt).
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui do corpus para o decodificador:
//!
//! 1. **Corpus** ([`corpus`]): leitura dos grupos de 3 linhas
//!    (tokens/POS/rótulos), remoção de prefixos BIO, mascaramento de
//!    palavras raras.
//! 2. **Contagem** ([`ngram`], [`emission`]): tabelas de probabilidade
//!    suavizadas sobre rótulos e pares (rótulo, palavra).
//! 3. **Transição** ([`interpolation`]): combinação de
//!    unigrama/bigrama/trigrama com back-off explícito.
//! 4. **Decodificação** ([`viterbi`]): motor de programação dinâmica
//!    genérico; [`hmm`] e [`memm`] fornecem as pontuações.
//! 5. **Saída** ([`submission`]): corridas de entidade como intervalos
//!    `início-fim` em CSV.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ner_markov::{AlgorithmMode, PipelineConfig, Sentence, TaggingPipeline};
//!
//! let corpus = vec![Sentence {
//!     tokens: vec!["Shaun".into(), "scored".into()],
//!     pos: vec!["NNP".into(), "VBD".into()],
//!     labels: vec!["B-PER".into(), "O".into()],
//! }];
//!
//! // Treina HMM, MEMM e baseline de uma só vez
//! let pipeline = TaggingPipeline::train(&corpus, PipelineConfig::default());
//!
//! // Decodifica com o modo escolhido
//! let tags = pipeline.predict(AlgorithmMode::Hmm, &corpus[0]);
//! assert_eq!(tags.len(), 2);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: orquestrador que treina e despacha os três modos.
//! - [`viterbi`]: o motor de decodificação compartilhado.
//! - [`interpolation`]: a política de back-off das transições.
//! - [`submission`]: formatação do CSV final.

pub mod baseline;
pub mod corpus;
pub mod emission;
pub mod error;
pub mod hmm;
pub mod interpolation;
pub mod maxent;
pub mod memm;
pub mod ngram;
pub mod pipeline;
pub mod submission;
pub mod viterbi;

pub use baseline::MajorityTagger;
pub use corpus::{parse_corpus, read_corpus, Sentence};
pub use error::{NerError, Result};
pub use hmm::HmmTagger;
pub use interpolation::InterpolationWeights;
pub use maxent::MaxentClassifier;
pub use memm::{FeatureScorer, MemmFeatures, MemmTagger};
pub use pipeline::{AlgorithmMode, PipelineConfig, TaggingPipeline};
pub use submission::Submission;
