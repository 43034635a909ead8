use crate::{
    config::ConsoleConfig,
    controllers::{lookup::LookupController, range::RangeView},
    render::{render_entry, render_log, render_table},
    state::Session,
    transport::ConnectClient,
};

use anyhow::Result;
use std::{
    io::{Write, stdout},
    rc::Rc,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::{LocalSet, spawn_local},
};
use tracing::{debug, info};

const HELP: &str = "\
commands:
  <key> | get <key>         look up one key (leading 0x is dropped)
  many <key> <key> ..       look up several keys at once
  prefix <prefix> [limit]   list keys under a prefix
  scan <begin> [end] [limit]
                            list keys from begin up to end (`-` = no end)
  start <yyyy-mm>           set range start
  end <yyyy-mm>             set range end
  search                    search the selected range
  range <start> <end>       set both ends and search
  month <yyyy> <mm>         show one month
  year <yyyy>               show every month of a year
  log                       reprint the exchange log
  table                     reprint the period table
  help | exit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Get(String),
    Many(Vec<String>),
    Prefix { prefix: String, limit: u64 },
    Scan { begin: String, end: Option<String>, limit: u64 },
    Start(String),
    End(String),
    Search,
    Range { start: String, end: String },
    Month { year: String, month: String },
    Year(String),
    Log,
    Table,
    Help,
    Exit,
}

impl Command {
    /// `None` for a blank line. Text that is not a command is a key.
    pub fn parse(line: &str) -> std::result::Result<Option<Command>, String> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let cmd = match (head, args.as_slice()) {
            ("exit" | "quit", []) => Command::Exit,
            ("help", [])          => Command::Help,
            ("log", [])           => Command::Log,
            ("table", [])         => Command::Table,
            ("search", [])        => Command::Search,
            ("get", [])           => Command::Get(String::new()),
            ("get", _)            => Command::Get(line["get".len()..].trim().to_string()),
            ("many", [])          => return Err("usage: many <key> <key> ..".into()),
            ("many", keys)        => Command::Many(keys.iter().map(|k| k.to_string()).collect()),
            ("prefix", [p])       => Command::Prefix { prefix: p.to_string(), limit: 0 },
            ("prefix", [p, n])    => Command::Prefix {
                prefix: p.to_string(),
                limit:  n.parse().map_err(|_| format!("bad limit `{n}`"))?,
            },
            ("prefix", _)         => return Err("usage: prefix <prefix> [limit]".into()),
            ("scan", [b])         => Command::Scan { begin: b.to_string(), end: None, limit: 0 },
            ("scan", [b, e])      => Command::Scan { begin: b.to_string(), end: scan_end(e), limit: 0 },
            ("scan", [b, e, n])   => Command::Scan {
                begin: b.to_string(),
                end:   scan_end(e),
                limit: n.parse().map_err(|_| format!("bad limit `{n}`"))?,
            },
            ("scan", _)           => return Err("usage: scan <begin> [end|-] [limit]".into()),
            ("start", [p])        => Command::Start(p.to_string()),
            ("end", [p])          => Command::End(p.to_string()),
            ("start" | "end", _)  => return Err(format!("usage: {head} <yyyy-mm>")),
            ("range", [s, e])     => Command::Range { start: s.to_string(), end: e.to_string() },
            ("range", _)          => return Err("usage: range <start> <end>".into()),
            ("month", [y, m])     => Command::Month { year: y.to_string(), month: m.to_string() },
            ("month", _)          => return Err("usage: month <yyyy> <mm>".into()),
            ("year", [y])         => Command::Year(y.to_string()),
            ("year", _)           => return Err("usage: year <yyyy>".into()),
            _                     => Command::Get(line.to_string()),
        };
        Ok(Some(cmd))
    }
}

fn scan_end(word: &str) -> Option<String> {
    (word != "-").then(|| word.to_string())
}

pub async fn run(cfg: ConsoleConfig) -> Result<()> {
    let session = Session::new();
    let kv = ConnectClient::new(&cfg.kv_url, cfg.timeout())?;
    let blockmeta = ConnectClient::new(&cfg.blockmeta_url, cfg.timeout())?;

    let lookup = Rc::new(
        LookupController::new(kv, session.clone()).with_hex_case(cfg.hex_case),
    );
    let range = Rc::new(RangeView::new(blockmeta, session.clone()));

    info!(kv = %cfg.kv_url, blockmeta = %cfg.blockmeta_url, "console starting");
    println!("[Console] kv service at {}, block meta service at {}", cfg.kv_url, cfg.blockmeta_url);
    println!("[Console] type `help` for commands");

    // every lookup and search runs as its own task on this one thread,
    // so overlapping calls interleave only while awaiting the network
    let local = LocalSet::new();
    local.run_until(async move {
        spawn_local(watch_session(session.clone(), cfg.explorer_url.clone()));

        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            stdout().flush().ok();

            let line = match reader.next_line().await? {
                Some(l) => l,
                None => break, // EOF
            };

            let cmd = match Command::parse(&line) {
                Ok(Some(cmd)) => cmd,
                Ok(None) => continue,
                Err(usage) => {
                    println!("{usage}");
                    continue;
                }
            };
            debug!(?cmd, "console command");

            match cmd {
                Command::Exit => {
                    println!("bye!");
                    break;
                }
                Command::Help => println!("{HELP}"),
                Command::Log => {
                    let (lines, in_flight) = session.read(|s| (render_log(s.log()), s.in_flight()));
                    for l in lines {
                        println!("{l}");
                    }
                    if in_flight > 0 {
                        println!("({in_flight} lookup(s) in flight)");
                    }
                }
                Command::Table => print_table(&session, &cfg.explorer_url),
                Command::Get(key) => {
                    let ctrl = lookup.clone();
                    spawn_local(async move {
                        ctrl.submit(&key).await;
                    });
                }
                Command::Many(keys) => {
                    let ctrl = lookup.clone();
                    spawn_local(async move {
                        ctrl.submit_many(&keys).await;
                    });
                }
                Command::Prefix { prefix, limit } => {
                    let ctrl = lookup.clone();
                    spawn_local(async move {
                        ctrl.submit_prefix(&prefix, limit).await;
                    });
                }
                Command::Scan { begin, end, limit } => {
                    let ctrl = lookup.clone();
                    spawn_local(async move {
                        ctrl.submit_scan(&begin, end.as_deref(), limit).await;
                    });
                }
                Command::Start(p) => {
                    range.set_start(&p);
                    print_table(&session, &cfg.explorer_url);
                }
                Command::End(p) => {
                    range.set_end(&p);
                    print_table(&session, &cfg.explorer_url);
                }
                Command::Search => {
                    if !range.can_search() {
                        println!("search disabled: set `start` and `end` first");
                        continue;
                    }
                    let view = range.clone();
                    spawn_local(async move {
                        view.run_search().await;
                    });
                }
                Command::Range { start, end } => {
                    let view = range.clone();
                    spawn_local(async move {
                        view.search(&start, &end).await;
                    });
                }
                Command::Month { year, month } => {
                    let view = range.clone();
                    spawn_local(async move {
                        view.month(&year, &month).await;
                    });
                }
                Command::Year(year) => {
                    let view = range.clone();
                    spawn_local(async move {
                        view.year(&year).await;
                    });
                }
            }
        }
        Ok::<_, anyhow::Error>(())
    })
    .await
}

fn print_table(session: &Session, explorer_url: &str) {
    for l in session.read(|s| render_table(&s.range, explorer_url)) {
        println!("{l}");
    }
}

// prints new log entries as they land and the table whenever a range call settles
async fn watch_session(session: Session, explorer_url: String) {
    let mut rx = session.subscribe();
    let mut seen = 0;
    let mut was_loading = false;

    while rx.changed().await.is_ok() {
        let (fresh, table) = {
            let state = rx.borrow_and_update();
            let fresh: Vec<String> = state.log().since(seen).iter().map(render_entry).collect();
            seen = state.log().len();

            let settled = was_loading && !state.range.loading;
            was_loading = state.range.loading;
            let table = settled.then(|| render_table(&state.range, &explorer_url));
            (fresh, table)
        };

        for l in fresh.iter().chain(table.iter().flatten()) {
            println!("{l}");
        }
    }
}
