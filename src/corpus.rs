//! # Corpus Anotado — Leitura e Pré-processamento
//!
//! O corpus de treino/teste é um arquivo de texto onde cada sentença ocupa
//! exatamente 3 linhas, com colunas separadas por tabulação:
//!
//! ```text
//! Shaun	Pollock	scored
//! NNP	NNP	VBD
//! B-PER	I-PER	O
//! ```
//!
//! 1ª linha: tokens; 2ª linha: etiquetas POS; 3ª linha: rótulos NER no
//! esquema BIO. As três colunas de uma mesma sentença têm sempre o mesmo
//! comprimento — qualquer desvio é um erro fatal de leitura.
//!
//! Além da leitura, este módulo implementa as duas transformações de
//! pré-processamento do pipeline:
//!
//! - [`strip_bio`]: remove os prefixos `B-`/`I-` dos rótulos, produzindo
//!   uma cópia independente (o corpus de entrada nunca é alterado);
//! - [`mask_rare_words`]: substitui tokens raros pelo token reservado
//!   [`UNKNOWN_WORD`], preparando o balde de desconhecidos do tagger de
//!   maioria.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NerError, Result};

/// Token reservado para palavras desconhecidas ou raras.
pub const UNKNOWN_WORD: &str = "UNK";

/// Rótulo "fora de entidade" do esquema BIO.
pub const OUTSIDE_LABEL: &str = "O";

/// Uma sentença anotada: colunas paralelas de tokens, etiquetas POS e
/// rótulos NER. O índice `i` refere-se à mesma posição nas três colunas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub tokens: Vec<String>,
    pub pos: Vec<String>,
    pub labels: Vec<String>,
}

impl Sentence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Interpreta o texto de um corpus como grupos de 3 linhas.
///
/// Devolve [`NerError::CorpusFormat`] se o número de linhas não for
/// múltiplo de 3 e [`NerError::AlignmentMismatch`] se alguma sentença
/// tiver colunas de comprimentos diferentes.
pub fn parse_corpus(text: &str) -> Result<Vec<Sentence>> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() % 3 != 0 {
        return Err(NerError::CorpusFormat { lines: lines.len() });
    }

    let mut sentences = Vec::with_capacity(lines.len() / 3);
    for (index, group) in lines.chunks(3).enumerate() {
        let tokens = split_columns(group[0]);
        let pos = split_columns(group[1]);
        let labels = split_columns(group[2]);
        if tokens.len() != pos.len() || pos.len() != labels.len() {
            return Err(NerError::AlignmentMismatch {
                index,
                tokens: tokens.len(),
                pos: pos.len(),
                labels: labels.len(),
            });
        }
        sentences.push(Sentence { tokens, pos, labels });
    }
    log::info!("parsed {} sentences from corpus", sentences.len());
    Ok(sentences)
}

/// Lê e interpreta um arquivo de corpus do disco.
pub fn read_corpus(path: impl AsRef<Path>) -> Result<Vec<Sentence>> {
    let text = fs::read_to_string(path)?;
    parse_corpus(&text)
}

fn split_columns(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split('\t').map(str::to_string).collect()
}

/// Remove o prefixo BIO de um rótulo: tudo até o primeiro `-`, inclusive,
/// é descartado (`"B-PER"` → `"PER"`). Rótulos sem separador, como `"O"`,
/// voltam intactos.
pub fn short_label(label: &str) -> String {
    match label.find('-') {
        Some(sep) => label[sep + 1..].to_string(),
        None => label.to_string(),
    }
}

/// Converte os rótulos BIO de todas as sentenças para rótulos curtos.
///
/// Devolve sentenças novas: a coluna de rótulos é realocada, de modo que
/// mutações no resultado jamais atingem o corpus de entrada.
pub fn strip_bio(sentences: &[Sentence]) -> Vec<Sentence> {
    sentences
        .iter()
        .map(|sentence| Sentence {
            tokens: sentence.tokens.clone(),
            pos: sentence.pos.clone(),
            labels: sentence.labels.iter().map(|l| short_label(l)).collect(),
        })
        .collect()
}

/// Substitui por [`UNKNOWN_WORD`] todo token com frequência no corpus
/// menor que `min_count`. As colunas POS e de rótulos não são alteradas.
pub fn mask_rare_words(sentences: &[Sentence], min_count: usize) -> Vec<Sentence> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for sentence in sentences {
        for token in &sentence.tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let mut masked = 0usize;
    let mut result = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        let mut tokens = Vec::with_capacity(sentence.tokens.len());
        for token in &sentence.tokens {
            if counts[token.as_str()] < min_count {
                masked += 1;
                tokens.push(UNKNOWN_WORD.to_string());
            } else {
                tokens.push(token.clone());
            }
        }
        result.push(Sentence {
            tokens,
            pos: sentence.pos.clone(),
            labels: sentence.labels.clone(),
        });
    }
    log::debug!("masked {masked} rare tokens (min_count = {min_count})");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corpus_groups_of_three_lines() {
        let text = "Shaun\tPollock\nNNP\tNNP\nB-PER\tI-PER\nhe\nPRP\nO\n";
        let sentences = parse_corpus(text).unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].tokens, vec!["Shaun", "Pollock"]);
        assert_eq!(sentences[0].pos, vec!["NNP", "NNP"]);
        assert_eq!(sentences[0].labels, vec!["B-PER", "I-PER"]);
        assert_eq!(sentences[1].tokens, vec!["he"]);
        assert_eq!(sentences[1].labels, vec!["O"]);
    }

    #[test]
    fn test_parse_corpus_empty_text() {
        assert_eq!(parse_corpus("").unwrap(), Vec::new());
    }

    #[test]
    fn test_parse_corpus_rejects_partial_sentence() {
        let text = "Shaun\nNNP\nB-PER\nhe\n";
        let err = parse_corpus(text).unwrap_err();
        assert!(matches!(err, NerError::CorpusFormat { lines: 4 }));
    }

    #[test]
    fn test_parse_corpus_rejects_misaligned_columns() {
        let text = "Shaun\tPollock\nNNP\nB-PER\tI-PER\n";
        let err = parse_corpus(text).unwrap_err();
        match err {
            NerError::AlignmentMismatch {
                index,
                tokens,
                pos,
                labels,
            } => {
                assert_eq!(index, 0);
                assert_eq!(tokens, 2);
                assert_eq!(pos, 1);
                assert_eq!(labels, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_label_drops_bio_prefix() {
        assert_eq!(short_label("B-PER"), "PER");
        assert_eq!(short_label("I-ORG"), "ORG");
        assert_eq!(short_label("O"), "O");
        assert_eq!(short_label("MISC"), "MISC");
    }

    #[test]
    fn test_strip_bio_leaves_source_untouched() {
        let corpus = vec![Sentence {
            tokens: vec!["Shaun".to_string(), "scored".to_string()],
            pos: vec!["NNP".to_string(), "VBD".to_string()],
            labels: vec!["B-PER".to_string(), "O".to_string()],
        }];
        let stripped = strip_bio(&corpus);
        assert_eq!(stripped[0].labels, vec!["PER", "O"]);
        assert_eq!(corpus[0].labels, vec!["B-PER", "O"]);
        assert_eq!(stripped[0].tokens, corpus[0].tokens);
    }

    #[test]
    fn test_mask_rare_words_replaces_below_threshold() {
        let corpus = vec![
            Sentence {
                tokens: vec!["Shaun".to_string(), "scored".to_string()],
                pos: vec!["NNP".to_string(), "VBD".to_string()],
                labels: vec!["PER".to_string(), "O".to_string()],
            },
            Sentence {
                tokens: vec!["Shaun".to_string(), "Pollock".to_string()],
                pos: vec!["NNP".to_string(), "NNP".to_string()],
                labels: vec!["PER".to_string(), "PER".to_string()],
            },
        ];
        let masked = mask_rare_words(&corpus, 2);
        // Shaun aparece 2x e sobrevive; scored e Pollock viram UNK
        assert_eq!(masked[0].tokens, vec!["Shaun", UNKNOWN_WORD]);
        assert_eq!(masked[1].tokens, vec!["Shaun", UNKNOWN_WORD]);
        assert_eq!(masked[0].labels, corpus[0].labels);
        assert_eq!(masked[1].pos, corpus[1].pos);
    }

    #[test]
    fn test_mask_rare_words_threshold_one_keeps_everything() {
        let corpus = vec![Sentence {
            tokens: vec!["one".to_string(), "time".to_string()],
            pos: vec!["CD".to_string(), "NN".to_string()],
            labels: vec!["O".to_string(), "O".to_string()],
        }];
        let masked = mask_rare_words(&corpus, 1);
        assert_eq!(masked[0].tokens, vec!["one", "time"]);
    }
}
