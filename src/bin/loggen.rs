//! Synthetic log generator: emits randomized service-style log lines on
//! stdout at irregular intervals. Useful as a demo feed:
//!
//!   loggen >> /tmp/demo.log & logtail /tmp/demo.log

use std::thread;
use std::time::Duration;

use chrono::Utc;
use rand::prelude::*;
use serde_json::{Map, Value};

const NOUNS: &[&str] = &[
    "alarm", "array", "bandwidth", "bus", "capacitor", "card", "circuit", "driver", "feed",
    "firewall", "hard drive", "interface", "matrix", "microchip", "monitor", "panel", "pixel",
    "port", "protocol", "sensor", "system", "transmitter",
];

const VERBS: &[&str] = &[
    "back up", "bypass", "calculate", "compress", "connect", "copy", "generate", "hack", "index",
    "input", "navigate", "override", "parse", "program", "quantify", "reboot", "synthesize",
    "transmit",
];

const ING_VERBS: &[&str] = &[
    "backing up", "bypassing", "calculating", "compressing", "connecting", "copying",
    "generating", "hacking", "indexing", "navigating", "overriding", "parsing", "programming",
    "quantifying", "synthesizing", "transmitting",
];

const ADVERBS: &[&str] = &[
    "quickly", "silently", "eventually", "lazily", "eagerly", "carefully", "boldly", "almost",
    "partially", "fully",
];

const PHRASES: &[&str] = &[
    "We need to bypass the neural TCP card!",
    "Try to transmit the HTTP transmitter, maybe it will quantify the multi-byte pixel!",
    "The SQL interface is down, navigate the bluetooth bus so we can back up the PCI matrix!",
    "Use the digital SCSI circuit, then you can parse the optical feed!",
    "The UTF8 application is down, copy the haptic bandwidth!",
    "If we override the protocol, we can get to the XML alarm through the mobile port!",
];

/// Weighted toward INFO, the way real services log.
const LEVELS: &[&str] = &[
    "DEBUG", "INFO", "INFO", "INFO", "INFO", "INFO", "INFO", "WARN", "ERROR", "ERROR", "ERROR",
    "ALERT",
];

fn main() {
    let mut rng = rand::thread_rng();
    let filepaths: Vec<String> = (0..20).map(|_| random_filepath(&mut rng)).collect();
    let service_methods: Vec<String> = (0..20)
        .flat_map(|_| {
            let noun = NOUNS.choose(&mut rng).unwrap();
            let service = format!("{}Service", capitalize(noun).replace(' ', ""));
            (0..10)
                .map(|_| {
                    let verb = VERBS.choose(&mut rng).unwrap().replace(' ', "");
                    let target = NOUNS.choose(&mut rng).unwrap();
                    format!("{service}.{verb}{}", capitalize(target).replace(' ', ""))
                })
                .collect::<Vec<_>>()
        })
        .collect();

    loop {
        let pause = rng.gen_range(200..2200);
        thread::sleep(Duration::from_millis(pause));
        println!("{}", make_log(&mut rng, &filepaths, &service_methods));
    }
}

fn make_log(rng: &mut ThreadRng, filepaths: &[String], service_methods: &[String]) -> String {
    let now = Utc::now().format("%H:%M:%S%.3f");
    let level = LEVELS.choose(rng).unwrap();
    let metric = format!("{}ms", rng.gen_range(0..5000));
    let action = ING_VERBS.choose(rng).unwrap();
    let service_method = service_methods.choose(rng).unwrap();

    match *level {
        "INFO" | "DEBUG" => {
            let adverb = ADVERBS.choose(rng).unwrap();
            let data_str = if rng.gen_bool(0.5) {
                let data = random_data(rng, 7);
                indent(4, &serde_json::to_string_pretty(&data).unwrap_or_default())
            } else {
                String::new()
            };
            format!("{level} {now} {metric} {action} {service_method}(...) {adverb} {data_str}")
        }
        _ => {
            let error_message = format!("Error: {}", PHRASES.choose(rng).unwrap());
            let trace = indent(4, &random_trace(rng, filepaths, service_methods));
            format!("{level} {now} {metric} {action} {service_method}\n    {error_message}\n{trace}")
        }
    }
}

fn random_data(rng: &mut ThreadRng, max_keys: usize) -> Value {
    let mut obj = Map::new();
    let num_keys = rng.gen_range(1..=max_keys);
    for _ in 0..num_keys {
        let key = (*NOUNS.choose(rng).unwrap()).to_string();
        let value = match rng.gen_range(0..7) {
            0..=2 => Value::String((*NOUNS.choose(rng).unwrap()).to_string()),
            3..=5 => Value::String(random_uuid(rng)),
            _ => random_data(rng, 5),
        };
        obj.insert(key, value);
    }
    Value::Object(obj)
}

fn random_trace(rng: &mut ThreadRng, filepaths: &[String], service_methods: &[String]) -> String {
    let depth = rng.gen_range(2..=10);
    (0..depth)
        .flat_map(|_| {
            let filepath = filepaths.choose(rng).unwrap();
            let line = rng.gen_range(1..=1500);
            let col = rng.gen_range(1..=120);
            let method = service_methods
                .choose(rng)
                .and_then(|sm| sm.split('.').nth(1))
                .unwrap_or("run");
            let base = filepath.rsplit('/').next().unwrap_or(filepath);
            vec![
                format!("- {base}:{line} {method}"),
                format!("    {filepath}:{line}:{col}"),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn random_filepath(rng: &mut ThreadRng) -> String {
    let dirs = ["srv", "var", "opt", "usr", "lib", "etc"];
    let exts = ["js", "ts", "rs", "go", "py"];
    format!(
        "/{}/{}/{}.{}",
        dirs.choose(rng).unwrap(),
        NOUNS.choose(rng).unwrap().replace(' ', "_"),
        VERBS.choose(rng).unwrap().replace(' ', "_"),
        exts.choose(rng).unwrap(),
    )
}

fn random_uuid(rng: &mut ThreadRng) -> String {
    let hex: String = (0..32)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn indent(n: usize, text: &str) -> String {
    let dent = " ".repeat(n);
    text.lines()
        .map(|l| format!("{dent}{l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
