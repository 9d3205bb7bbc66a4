use std::env;
use std::error;

use reqwest::Url;

const DEFAULT_PROBE_URL: &str = "http://127.0.0.1:8080/api/health";

fn main() -> Result<(), Box<dyn error::Error>> {
    let args: Vec<String> = env::args().collect();
    let target = args.get(1).map_or(DEFAULT_PROBE_URL, String::as_str);

    let url = Url::parse(target)?;

    let body = reqwest::blocking::get(url)?;
    if !body.status().is_success() {
        panic!("Request Failed!")
    }

    Ok(())
}
