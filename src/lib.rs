use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::mpsc,
};

use threadpool::ThreadPool;

pub use cli::CLIParser;
use error::Error;
use frequency::FrequencyTable;
use huffman::{build_code, HuffmanEncoder};
pub use report::Report;

mod cli;
pub mod error;
pub mod frequency;
pub mod huffman;
mod logger;
mod report;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_files: Vec<PathBuf>,
    number_of_threads: usize,
    show_tree: bool,
    verify_round_trip: bool,
}

#[derive(Clone, Copy, Default)]
pub struct AnalysisOptions {
    pub show_tree: bool,
    pub verify_round_trip: bool,
}

impl From<&Arguments> for AnalysisOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            show_tree: value.show_tree,
            verify_round_trip: value.verify_round_trip,
        }
    }
}

fn path_name(file_path: &Path) -> String {
    file_path.to_string_lossy().into_owned()
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path)
        .map_err(|e| Error::UnableToOpenInputFileForReading(path_name(file_path), e))
}

fn read_input_file(file_path: &Path) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    open_input_file(file_path)?
        .read_to_end(&mut content)
        .map_err(|e| Error::FailedToReadInputFile(path_name(file_path), e))?;
    Ok(content)
}

fn count_input_file(file_path: &Path) -> Result<FrequencyTable> {
    FrequencyTable::from_reader(open_input_file(file_path)?)
        .map_err(|e| Error::FailedToReadInputFile(path_name(file_path), e))
}

fn verify_round_trip(name: &str, content: &[u8], report: &Report) -> Result<()> {
    let encoded = HuffmanEncoder::new(&report.code_table)
        .encode_sequence(content)
        .map_err(|e| Error::RoundTripFailed(name.to_owned(), e))?;
    let decoded = report
        .tree
        .decode_bytes(&encoded.to_bytes(), encoded.bit_len())
        .map_err(|e| Error::RoundTripFailed(name.to_owned(), e))?;
    if decoded != content {
        return Err(Error::RoundTripMismatch(name.to_owned()));
    }
    log::info!("Round trip of {} verified with {} bits", name, encoded.bit_len());
    Ok(())
}

/// Runs the whole pipeline for one file with its own frequency table.
pub fn analyze_file(file_path: &Path, options: &AnalysisOptions) -> Result<Report> {
    let name = path_name(file_path);
    log::info!("Analyzing {}", name);
    let content = if options.verify_round_trip {
        Some(read_input_file(file_path)?)
    } else {
        None
    };
    let frequencies = match &content {
        Some(content) => FrequencyTable::from(content.as_slice()),
        None => count_input_file(file_path)?,
    };
    let (tree, code_table) = build_code(&frequencies)
        .map_err(|e| Error::HuffmanCodeConstructionFailed(name.clone(), e))?;
    logger::log_code_table(&name, &code_table);

    let mut report = Report {
        name,
        frequencies,
        tree,
        code_table,
        show_tree: options.show_tree,
        round_trip_verified: false,
    };
    if let Some(content) = content {
        verify_round_trip(&report.name, &content, &report)?;
        report.round_trip_verified = true;
    }
    Ok(report)
}

/// Analyzes every input file as an independent run on a thread pool.
/// Results are returned in the order of the input files.
pub fn analyze_files(arguments: &Arguments) -> Vec<(PathBuf, Result<Report>)> {
    let options = AnalysisOptions::from(arguments);
    let threadpool = ThreadPool::new(arguments.number_of_threads.max(1));
    let (sender, receiver) = mpsc::channel();
    for (index, file_path) in arguments.input_files.iter().cloned().enumerate() {
        let sender = sender.clone();
        threadpool.execute(move || {
            let result = analyze_file(&file_path, &options);
            if let Err(e) = &result {
                log::error!("{}", e);
            }
            let _ = sender.send((index, result));
        });
    }
    drop(sender);

    let mut results: Vec<Option<Result<Report>>> =
        arguments.input_files.iter().map(|_| None).collect();
    for (index, result) in receiver {
        results[index] = Some(result);
    }
    arguments
        .input_files
        .iter()
        .cloned()
        .zip(results)
        .map(|(file_path, result)| {
            let result =
                result.unwrap_or_else(|| Err(Error::AnalysisAborted(path_name(&file_path))));
            (file_path, result)
        })
        .collect()
}
