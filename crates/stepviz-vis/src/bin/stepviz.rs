//! stepviz binary
//!
//! Serve the canvas view, or watch one operation in the terminal.

use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use stepviz_algorithms::{parse_position, parse_value, OperationKind, OperationParams, ScreenKind};
use stepviz_engine::StepDelay;
use stepviz_vis::{
    menu, KeyCommand, RunReport, StartRequest, TerminalDriver, TerminalOptions, VisConfig,
    VisServer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
usage:
  stepviz serve [port]
  stepviz run <operation> [values] [--target N] [--value N] [--position N]
                                   [--delay SECS] [--step] [--no-color] [--doubly]
  stepviz list

keys while running: p pause/resume, n next step, + faster, - slower, s step mode, q quit";

#[derive(Debug)]
enum Command {
    Serve { port: Option<u16> },
    Run {
        screen: ScreenKind,
        request: StartRequest,
        options: TerminalOptions,
    },
    List,
    Help,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepviz=info,stepviz_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Serve { port } => {
            let mut config = VisConfig::from_env();
            if let Some(port) = port {
                config = config.with_port(port);
            }
            println!("stepviz");
            println!("=======");
            println!();
            println!("Starting visualization server on http://localhost:{}", config.addr.port());
            println!("Open in browser to pick a screen and watch it run.");
            println!();
            VisServer::new(config).serve().await?;
        }
        Command::Run {
            screen,
            request,
            options,
        } => {
            let report =
                tokio::task::spawn_blocking(move || run_in_terminal(screen, request, &options))
                    .await??;
            if let Some(report) = report {
                if report.result.is_err() {
                    std::process::exit(1);
                }
            }
        }
        Command::List => print_menu(),
        Command::Help => println!("{USAGE}"),
    }

    Ok(())
}

fn run_in_terminal(
    screen: ScreenKind,
    request: StartRequest,
    options: &TerminalOptions,
) -> stepviz_vis::Result<Option<RunReport>> {
    let (tx, keys) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match KeyCommand::parse(&line) {
                Some(key) => {
                    if tx.send(key).is_err() {
                        break;
                    }
                }
                None => eprintln!("unknown key {:?}", line.trim()),
            }
        }
    });

    let mut driver = TerminalDriver::new(screen, options, io::stdout());
    driver.run(request, &keys)
}

fn print_menu() {
    for screen in menu() {
        let note = if screen.persistent { " (keeps its structure)" } else { "" };
        println!("{}{note}", screen.title);
        for entry in screen.operations {
            if entry.parameters.is_empty() {
                println!("  {}", entry.operation);
            } else {
                println!("  {} [{}]", entry.operation, entry.parameters.join(", "));
            }
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };
    match command.as_str() {
        "serve" => {
            let port = rest
                .first()
                .map(|p| p.parse::<u16>().map_err(|_| format!("invalid port {p:?}")))
                .transpose()?;
            Ok(Command::Serve { port })
        }
        "run" => parse_run(rest),
        "list" => Ok(Command::List),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(format!("unknown command {other:?}\n\n{USAGE}")),
    }
}

fn parse_run(args: &[String]) -> Result<Command, String> {
    let (operation, mut rest) = args
        .split_first()
        .ok_or_else(|| format!("missing operation\n\n{USAGE}"))?;
    let operation: OperationKind = operation.parse().map_err(|e| format!("{e}"))?;

    let mut request = StartRequest::new(operation);
    let mut params = OperationParams::default();
    let mut options = TerminalOptions::default();
    let mut doubly = false;

    while let Some((arg, tail)) = rest.split_first() {
        rest = tail;
        let mut next = |flag: &str| -> Result<String, String> {
            let (value, tail) = rest
                .split_first()
                .ok_or_else(|| format!("{flag} needs a value"))?;
            rest = tail;
            Ok(value.clone())
        };
        match arg.as_str() {
            "--target" => {
                params.target = Some(parse_value(&next(arg)?).map_err(|e| e.to_string())?);
            }
            "--value" => {
                params.value = Some(parse_value(&next(arg)?).map_err(|e| e.to_string())?);
            }
            "--position" => {
                params.position = Some(parse_position(&next(arg)?).map_err(|e| e.to_string())?);
            }
            "--delay" => {
                let secs: f64 = next(arg)?
                    .parse()
                    .map_err(|_| "--delay needs seconds".to_string())?;
                options.delay = StepDelay::from_secs(secs);
            }
            "--step" => options.step_mode = true,
            "--no-color" => options.color = false,
            "--doubly" => doubly = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            values if request.values.is_none() => request.values = Some(values.to_string()),
            extra => return Err(format!("unexpected argument {extra:?}")),
        }
    }

    let screen = match operation.screen() {
        ScreenKind::SinglyLinkedList if doubly => ScreenKind::DoublyLinkedList,
        screen => screen,
    };
    Ok(Command::Run {
        screen,
        request: request.with_params(params),
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn parses_serve() {
        assert!(matches!(
            parse_args(&args("serve 8080")),
            Ok(Command::Serve { port: Some(8080) })
        ));
        assert!(matches!(parse_args(&args("serve")), Ok(Command::Serve { port: None })));
        assert!(parse_args(&args("serve http")).is_err());
    }

    #[test]
    fn parses_run_with_flags() {
        let command = parse_args(&args(
            "run list-insert-position 1,2,3 --value 10 --position 2 --doubly --step --no-color",
        ))
        .unwrap();
        let Command::Run {
            screen,
            request,
            options,
        } = command
        else {
            panic!("expected run");
        };
        assert_eq!(screen, ScreenKind::DoublyLinkedList);
        assert_eq!(request.operation, Some(OperationKind::ListInsertPosition));
        assert_eq!(request.values.as_deref(), Some("1,2,3"));
        assert_eq!(request.params.value, Some(10.0));
        assert_eq!(request.params.position, Some(2));
        assert!(options.step_mode);
        assert!(!options.color);
    }

    #[test]
    fn rejects_bad_run_arguments() {
        assert!(parse_args(&args("run wobble-sort 1,2")).is_err());
        assert!(parse_args(&args("run linear-search 1,2 --target")).is_err());
        assert!(parse_args(&args("run linear-search 1,2 --target x")).is_err());
        assert!(parse_args(&args("run bubble-sort 1,2 3,4")).is_err());
        assert!(parse_args(&args("run bubble-sort --fast")).is_err());
    }

    #[test]
    fn delay_is_clamped() {
        let Ok(Command::Run { options, .. }) = parse_args(&args("run heap-sort 3,1 --delay 9"))
        else {
            panic!("expected run");
        };
        assert_eq!(options.delay.as_secs(), StepDelay::MAX);
    }
}
