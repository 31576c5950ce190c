use super::Message;
use crate::config::Modality;
use crate::error::PromptError;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const HEAD: &str = include_str!("../../prompts/head.txt");
const METRICS: &str = include_str!("../../prompts/metrics.txt");
const FEWSHOT: &str = include_str!("../../prompts/fewshot_instruction.txt");
const INSTRUCTION: &str = include_str!("../../prompts/instruction.txt");

fn builtin_modality(modality: Modality) -> &'static str {
    match modality {
        Modality::WaveformSingle => include_str!("../../prompts/modality/waveform_single.txt"),
        Modality::WaveformMulti => include_str!("../../prompts/modality/waveform_multi.txt"),
        Modality::Autocorr => include_str!("../../prompts/modality/autocorr.txt"),
        Modality::SpikeLocations => include_str!("../../prompts/modality/spike_locations.txt"),
        Modality::AmplitudePlot => include_str!("../../prompts/modality/amplitude_plot.txt"),
    }
}

/// Instruction texts sent as system messages
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub head: String,
    pub modality: HashMap<Modality, String>,
    pub metrics: String,
    pub fewshot: String,
    pub instruction: String,
}

impl PromptSet {
    /// Texts compiled into the binary
    pub fn builtin() -> Self {
        Self {
            head: HEAD.trim().to_string(),
            modality: Modality::ALL
                .into_iter()
                .map(|m| (m, builtin_modality(m).trim().to_string()))
                .collect(),
            metrics: METRICS.trim().to_string(),
            fewshot: FEWSHOT.trim().to_string(),
            instruction: INSTRUCTION.trim().to_string(),
        }
    }

    /// Built-in texts, with any file present under `dir` taking precedence
    ///
    /// The override directory mirrors `prompts/`: `head.txt`, `metrics.txt`,
    /// `fewshot_instruction.txt`, `instruction.txt` and `modality/<name>.txt`.
    pub fn load(dir: Option<&Path>) -> Result<Self, PromptError> {
        let mut set = Self::builtin();
        let Some(dir) = dir else {
            return Ok(set);
        };

        override_from(&mut set.head, &dir.join("head.txt"))?;
        override_from(&mut set.metrics, &dir.join("metrics.txt"))?;
        override_from(&mut set.fewshot, &dir.join("fewshot_instruction.txt"))?;
        override_from(&mut set.instruction, &dir.join("instruction.txt"))?;

        for modality in Modality::ALL {
            let path = dir.join("modality").join(format!("{}.txt", modality));
            if let Some(text) = set.modality.get_mut(&modality) {
                override_from(text, &path)?;
            }
        }

        Ok(set)
    }

    /// Assemble the system preamble shared by every reviewer in a run
    pub fn build_system_messages(
        &self,
        modalities: &[Modality],
        with_metrics: bool,
        with_fewshot: bool,
    ) -> Vec<Message> {
        let mut messages = vec![Message::system(&self.head)];

        for modality in modalities {
            if let Some(text) = self.modality.get(modality) {
                messages.push(Message::system(text));
            }
        }

        if with_metrics {
            messages.push(Message::system(&self.metrics));
        }

        if with_fewshot {
            messages.push(Message::system(&self.fewshot));
        }

        messages.push(Message::system(&self.instruction));
        messages
    }
}

fn override_from(slot: &mut String, path: &Path) -> Result<(), PromptError> {
    if !path.is_file() {
        return Ok(());
    }

    let text = std::fs::read_to_string(path).map_err(|e| PromptError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Using prompt override {:?}", path);
    *slot = text.trim().to_string();
    Ok(())
}
