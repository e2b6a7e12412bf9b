//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use crate::core::config::TranslatorConfig;
use crate::core::translator::BatchTranslator;
use crate::lang::{route, DelimiterClass, LanguageTag, LANGUAGES};
use crate::splitter::split_sentences;
use crate::stub::{PassthroughProcessor, StubLoader, StubMode};
use crate::core::models::ModelLoader;

/// Commands for the batch translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split text into sentences
    Split {
        /// Language tag (FLORES code, e.g. eng_Latn)
        #[arg(short, long)]
        lang: String,

        /// Text to split
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// File to split (UTF-8)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Translate text or a file through the stub engine
    Translate {
        /// Source language tag (default: eng_Latn)
        #[arg(long, default_value = "eng_Latn")]
        source_lang: String,

        /// Target language tag (default: hin_Deva)
        #[arg(long, default_value = "hin_Deva")]
        target_lang: String,

        /// Paragraph to translate
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// File to translate, one paragraph per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sentences per model invocation
        #[arg(long)]
        batch_size: Option<usize>,

        /// Beam search width
        #[arg(long)]
        beam_width: Option<usize>,

        /// Token cap for encoding and generation
        #[arg(long)]
        max_length: Option<usize>,
    },

    /// List registered language tags
    Languages,
}

/// Handle the split command
pub fn handle_split(lang: String, text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<()> {
    let tag = LanguageTag::new(lang);
    let text = read_input(text, file)?;

    let sentences = split_sentences(&text, &tag)?;
    info!("Split into {} sentences", sentences.len());
    for sentence in sentences {
        println!("{sentence}");
    }
    Ok(())
}

/// Handle the translate command
#[allow(clippy::too_many_arguments)]
pub fn handle_translate(
    source_lang: String,
    target_lang: String,
    text: Option<String>,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    batch_size: Option<usize>,
    beam_width: Option<usize>,
    max_length: Option<usize>,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let src = LanguageTag::new(source_lang);
    let tgt = LanguageTag::new(target_lang);

    let mut config = TranslatorConfig::from_env()?;
    if let Some(batch_size) = batch_size {
        config.batch_size = batch_size;
    }
    if let Some(beam_width) = beam_width {
        config.beam_width = beam_width;
    }
    if let Some(max_length) = max_length {
        config.max_length = max_length;
    }
    config.log_summary();

    let translator = BatchTranslator::new(config)?;
    let family = route(&src, &tgt)?;
    info!("Routing {} -> {} via checkpoint {}", src, tgt, family.checkpoint());

    // Demo backend: uppercase when the target script is Latin so the output
    // is visibly transformed, plain echo otherwise
    let mode = match tgt.resolve()?.delimiters {
        DelimiterClass::Latin => StubMode::Uppercase,
        _ => StubMode::Identity,
    };
    let loader = StubLoader::new(mode);
    let handle = loader.load(
        family.checkpoint(),
        translator.config().quantization,
        &translator.config().attn_implementation,
    )?;
    let processor = PassthroughProcessor;

    let paragraphs: Vec<String> = read_input(text, file)?
        .lines()
        .map(str::to_string)
        .filter(|line| !line.trim().is_empty())
        .collect();

    if paragraphs.is_empty() {
        anyhow::bail!("No input text to translate");
    }

    let pb = ProgressBar::new(paragraphs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut translated = Vec::with_capacity(paragraphs.len());
    for paragraph in &paragraphs {
        let out = translator.translate_paragraph(paragraph, &src, &tgt, &handle, &processor)?;
        translated.push(out);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let body = translated.join("\n");
    match output {
        Some(path) => {
            std::fs::write(&path, body + "\n")?;
            info!("Wrote {} paragraphs to {}", translated.len(), path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}

/// Handle the languages command
pub fn handle_languages() {
    println!("{:<10} {:<5} {:<8} {}", "tag", "iso", "side", "delimiters");
    for lang in LANGUAGES {
        let side = match lang.side {
            crate::lang::Side::English => "english",
            crate::lang::Side::Indic => "indic",
        };
        println!("{:<10} {:<5} {:<8} {:?}", lang.flores, lang.iso, side, lang.delimiters);
    }
}

/// Read text from the --text flag, a file, or fail
fn read_input(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => anyhow::bail!("Either --text or --file is required"),
    }
}
