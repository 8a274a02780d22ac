//! # Formatação de Submissão
//!
//! Converte as predições por sentença do corpus de teste no CSV final: os
//! rótulos são achatados em uma única sequência com índices globais de
//! token (base 0), os prefixos BIO são removidos, e cada corrida maximal
//! de rótulos idênticos diferente de `O` vira um intervalo inclusivo
//! `início-fim`. Como os índices são globais, uma corrida pode atravessar
//! o limite entre sentenças.
//!
//! O CSV tem o cabeçalho `Type,Prediction` e uma linha por tipo de
//! entidade, na ordem fixa de [`SUBMISSION_TYPES`]; os intervalos de cada
//! linha são separados por espaço.

use std::collections::HashMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::corpus::short_label;
use crate::error::Result;

/// Tipos de entidade da submissão, na ordem das linhas do CSV.
pub const SUBMISSION_TYPES: [&str; 4] = ["ORG", "MISC", "PER", "LOC"];

/// Intervalos de predição agrupados por tipo de entidade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    ranges: HashMap<String, Vec<String>>,
}

impl Submission {
    /// Constrói a submissão a partir das predições de cada sentença, na
    /// ordem do corpus de teste.
    pub fn from_predictions(predictions: &[Vec<String>]) -> Self {
        let flat: Vec<String> = predictions
            .iter()
            .flat_map(|sentence| sentence.iter().map(|label| short_label(label)))
            .collect();

        let mut ranges: HashMap<String, Vec<String>> = HashMap::new();
        let mut i = 0;
        while i < flat.len() {
            let current = &flat[i];
            if SUBMISSION_TYPES.contains(&current.as_str()) {
                let start = i;
                while i + 1 < flat.len() && flat[i] == flat[i + 1] {
                    i += 1;
                }
                ranges
                    .entry(current.clone())
                    .or_default()
                    .push(format!("{start}-{i}"));
            }
            i += 1;
        }
        Self { ranges }
    }

    /// Intervalos de um tipo de entidade, na ordem de descoberta; vazio
    /// para tipos sem corridas.
    pub fn ranges(&self, entity: &str) -> &[String] {
        match self.ranges.get(entity) {
            Some(ranges) => ranges,
            None => &[],
        }
    }

    /// Renderiza o CSV completo, cabeçalho incluído.
    pub fn to_csv_string(&self) -> String {
        let mut csv = String::from("Type,Prediction\n");
        for entity in SUBMISSION_TYPES {
            let line = self
                .ranges
                .get(entity)
                .map(|ranges| ranges.join(" "))
                .unwrap_or_default();
            csv.push_str(entity);
            csv.push(',');
            csv.push_str(&line);
            csv.push('\n');
        }
        csv
    }

    /// Escreve o CSV em qualquer destino `io::Write`.
    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<()> {
        let total: usize = self.ranges.values().map(Vec::len).sum();
        log::info!("writing submission with {total} ranges");
        out.write_all(self.to_csv_string().as_bytes())?;
        Ok(())
    }
}
