//! Stat text normalization command

use poedata::convert_stat_name;

/// Print the matcher form of each stat text, one per line
pub fn handle(texts: &[String]) {
    for text in texts {
        match convert_stat_name(text) {
            Some(normalized) => println!("{}", normalized),
            None => println!("(empty)"),
        }
    }
}
