use std::env::args_os;
use std::process::ExitCode;

use byte_huffman::{analyze_files, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    let mut exit_code = ExitCode::SUCCESS;
    for (file_path, result) in analyze_files(&arguments) {
        match result {
            Ok(report) => println!("{}\n", report),
            Err(e) => {
                eprintln!(
                    "Analysis of '{}' failed because of: {}",
                    file_path.display(),
                    e
                );
                exit_code = ExitCode::FAILURE;
            }
        }
    }
    exit_code
}
