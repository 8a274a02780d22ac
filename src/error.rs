//! # Erros do Crate
//!
//! Tipos de erro compartilhados por leitura de corpus e configuração de
//! modelos. Falhas de formato e de alinhamento são fatais: nenhum modelo
//! parcial é produzido a partir de um corpus malformado.

use thiserror::Error;

/// Alias de `Result` usado em todo o crate.
pub type Result<T> = std::result::Result<T, NerError>;

/// Erros de leitura do corpus e de configuração dos modelos.
#[derive(Error, Debug)]
pub enum NerError {
    /// O arquivo de corpus não é formado por grupos de exatamente 3 linhas.
    #[error("corpus has {lines} lines, expected a multiple of 3 (tokens/POS/labels per sentence)")]
    CorpusFormat { lines: usize },

    /// As três colunas de uma sentença têm comprimentos diferentes.
    #[error("sentence {index}: tokens/POS/labels have lengths {tokens}/{pos}/{labels}, columns must align")]
    AlignmentMismatch {
        index: usize,
        tokens: usize,
        pos: usize,
        labels: usize,
    },

    /// Os pesos de interpolação não somam 1.
    #[error("interpolation weights must sum to 1, got {sum}")]
    InvalidWeights { sum: f64 },

    /// Falha de E/S ao ler um arquivo de corpus.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
