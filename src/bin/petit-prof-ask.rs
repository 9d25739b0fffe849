//! `petit-prof-ask`: terminal front end for the tutor.
//!
//! Sends one question to the backend's `/chat` endpoint and prints the
//! pedagogical reply.
//!
//! # Usage
//!
//! ```text
//! petit-prof-ask [-n NIVEAU] [-m MATIERE] [-u URL] [QUESTION...]
//!
//! Options:
//!   -n, --niveau <NIVEAU>    CP, CE1, CE2, CM1 or CM2 (default: CP)
//!   -m, --matiere <MATIERE>  maths, histoire or culture (default: maths)
//!   -u, --url <URL>          backend base URL
//!   -h, --help               print this help
//! ```
//!
//! Without QUESTION words the question is read from stdin.
//!
//! Backend URL resolution order:
//!   1. `--url <URL>` flag
//!   2. `$PETIT_PROF_BACKEND_URL`
//!   3. `http://127.0.0.1:8000`

use std::process;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use petit_prof::client::{self, AskClient, ClientError};
use petit_prof::relay::ChatRequest;
use petit_prof::tutor::{Level, Subject};

// ── CLI arg parsing ────────────────────────────────────────────────────────

struct Args {
    niveau: String,
    matiere: String,
    url: Option<String>,
    question: Vec<String>,
}

fn print_help() {
    println!("Usage: petit-prof-ask [-n NIVEAU] [-m MATIERE] [-u URL] [QUESTION...]");
    println!();
    println!("Options:");
    println!("  -n, --niveau <NIVEAU>    CP, CE1, CE2, CM1 or CM2 (default: CP)");
    println!("  -m, --matiere <MATIERE>  maths, histoire or culture (default: maths)");
    println!("  -u, --url <URL>          backend base URL (default: ${}, then {})",
        client::BACKEND_URL_ENV, client::DEFAULT_BACKEND_URL);
    println!("  -h, --help               print this help");
}

fn take_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> String {
    iter.next().unwrap_or_else(|| {
        eprintln!("error: {flag} requires a value");
        process::exit(2);
    })
}

fn parse_args() -> Args {
    let mut args = Args {
        niveau: Level::Cp.label().to_string(),
        matiere: Subject::Maths.label().to_string(),
        url: None,
        question: Vec::new(),
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-n" | "--niveau" => args.niveau = take_value(&mut iter, "-n/--niveau"),
            "-m" | "--matiere" => args.matiere = take_value(&mut iter, "-m/--matiere"),
            "-u" | "--url" => args.url = Some(take_value(&mut iter, "-u/--url")),
            "--" => {
                args.question.extend(iter.by_ref());
                break;
            }
            _ => args.question.push(arg),
        }
    }

    args
}

// ── Main ───────────────────────────────────────────────────────────────────

async fn read_question() -> std::io::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all("Pose ta question ici : ".as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = parse_args();

    // Same closed lists as the server; reject locally before any network call.
    let level = match args.niveau.parse::<Level>() {
        Ok(l) => l,
        Err(e) => {
            let accepted: Vec<_> = Level::ALL.iter().map(|l| l.label()).collect();
            eprintln!("{e} Choisis parmi : {}", accepted.join(", "));
            process::exit(2);
        }
    };
    let subject = match args.matiere.parse::<Subject>() {
        Ok(s) => s,
        Err(e) => {
            let accepted: Vec<_> = Subject::ALL.iter().map(|s| s.label()).collect();
            eprintln!("{e} Choisis parmi : {}", accepted.join(", "));
            process::exit(2);
        }
    };

    let question = if args.question.is_empty() {
        match read_question().await {
            Ok(q) => q,
            Err(e) => {
                eprintln!("error: cannot read question: {e}");
                process::exit(1);
            }
        }
    } else {
        args.question.join(" ")
    };
    if question.is_empty() {
        eprintln!("Pose d'abord une question !");
        process::exit(2);
    }

    let base_url = args.url.unwrap_or_else(client::backend_url_from_env);
    let ask = match AskClient::new(&base_url, client::DEFAULT_TIMEOUT) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let req = ChatRequest {
        question,
        niveau: level.label().to_string(),
        matiere: subject.label().to_string(),
    };

    match ask.ask(&req).await {
        Ok(reply) => {
            println!("🤖 Réponse pédagogique :");
            println!();
            println!("{reply}");
        }
        Err(e @ ClientError::Server { .. }) => {
            eprintln!("{e}");
            if let ClientError::Server { message: Some(m), .. } = &e {
                eprintln!("{m}");
            }
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
