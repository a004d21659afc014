use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::huffman::code::{BitString, CodeTable};
use crate::huffman::render::symbol_label;

const CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_PATTERN: &str = "{d(%H:%M:%S%.3f)} {l:<5} {t} - {m}{n}";

#[ctor::ctor]
fn init() {
    if let Err(e) = log4rs::init_file(CONFIG_FILE, Default::default()) {
        if init_fallback().is_ok() {
            log::debug!("Using fallback logger, {} not loaded: {}", CONFIG_FILE, e);
        }
    }
}

fn init_fallback() -> Result<(), Box<dyn std::error::Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}

pub fn log_code_table(name: &str, code_table: &CodeTable) {
    fn get_code_word_list(code_table: &CodeTable) -> Vec<String> {
        code_table
            .iter()
            .map(|(symbol, code_word)| {
                format!("{}={}", symbol_label(symbol), BitString(code_word))
            })
            .collect()
    }
    log::debug!("{} {:?}", name, get_code_word_list(code_table));
}
