//! Xiangqi Rules CLI
//!
//! 命令行界面，用于查询合法走法、检测将军和回放对局
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 逐行收发 JSON

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use xiangqi_rules::test_positions::{self, START};
use xiangqi_rules::{
    format_square, parse_move, parse_square, Color, Game, GameState, Position, RuleConfig,
};

#[derive(Parser)]
#[command(name = "xiangqi-rules")]
#[command(about = "Xiangqi rules engine", long_about = None)]
struct Cli {
    /// 规则配置文件（JSON）
    #[arg(long, global = true)]
    rules: Option<String>,

    /// 使用兼容规则（将可斜走，仅被将军时检查自将）
    #[arg(long, global = true)]
    reference: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// FEN 字符串或局面名（默认初始局面）
        #[arg(long)]
        fen: Option<String>,

        /// 只列出某格棋子的走法，如 e1
        #[arg(long)]
        square: Option<String>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 检测将军与对局状态
    Check {
        /// FEN 字符串或局面名
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 回放走法序列，如 `play b1c3 b10c8`
    Play {
        /// 起始 FEN 字符串或局面名（默认初始局面）
        #[arg(long)]
        fen: Option<String>,

        /// 走法列表
        moves: Vec<String>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

#[derive(Serialize, Deserialize)]
struct MovesResponse {
    moves: Vec<String>,
    total: usize,
}

#[derive(Serialize, Deserialize)]
struct PlayStep {
    #[serde(rename = "move")]
    mv: String,
    applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PlayResponse {
    steps: Vec<PlayStep>,
    fen: String,
    state: GameState,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    square: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CheckInfo {
    red: bool,
    black: bool,
}

#[derive(Serialize, Deserialize, Default, Debug)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<GameState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_check: Option<CheckInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_status(game: &Game) -> Self {
        Self {
            ok: true,
            fen: Some(game.to_fen()),
            state: Some(game.game_state()),
            turn: Some(game.current_turn()),
            ..Default::default()
        }
    }

    fn success_move(game: &Game, applied: bool, reason: Option<String>) -> Self {
        Self {
            applied: Some(applied),
            error: reason,
            ..Self::success_status(game)
        }
    }

    fn success_legal_moves(legal_moves: Vec<String>) -> Self {
        Self {
            ok: true,
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_check(game: &Game) -> Self {
        Self {
            ok: true,
            in_check: Some(check_info(game)),
            state: Some(game.game_state()),
            ..Default::default()
        }
    }

    fn success_board(game: &Game) -> Self {
        Self {
            ok: true,
            board: Some(game.board().to_string()),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn check_info(game: &Game) -> CheckInfo {
    CheckInfo {
        red: game.is_in_check(Color::Red),
        black: game.is_in_check(Color::Black),
    }
}

fn move_to_str(from: Position, to: Position) -> String {
    format!("{}{}", format_square(from), format_square(to))
}

/// 命名局面或 FEN 字符串
fn resolve_fen(fen: Option<&str>) -> &str {
    match fen {
        None => START,
        Some(s) => test_positions::by_name(s).unwrap_or(s),
    }
}

fn load_rules(cli: &Cli) -> Result<RuleConfig, String> {
    if cli.reference {
        return Ok(RuleConfig::reference());
    }
    match &cli.rules {
        Some(path) => RuleConfig::from_file(path),
        None => Ok(RuleConfig::default()),
    }
}

fn legal_move_strings(game: &Game, square: Option<&str>) -> Result<Vec<String>, String> {
    let moves = match square {
        Some(square) => {
            let from = parse_square(square)?;
            game.legal_moves(from)
                .map_err(|e| e.to_string())?
                .into_iter()
                .map(|to| (from, to))
                .collect()
        }
        None => game.all_legal_moves(),
    };
    Ok(moves.into_iter().map(|(from, to)| move_to_str(from, to)).collect())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let rules = load_rules(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = match cli.command {
        Commands::Moves { fen, square, json } => run_moves(resolve_fen(fen.as_deref()), square, json, rules),
        Commands::Check { fen, json } => run_check(resolve_fen(Some(fen.as_str())), json, rules),
        Commands::Play { fen, moves, json } => run_play(resolve_fen(fen.as_deref()), &moves, json, rules),
        Commands::Server => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_server(stdin.lock(), stdout.lock(), rules).map_err(|e| e.to_string())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_moves(fen: &str, square: Option<String>, json: bool, rules: RuleConfig) -> Result<(), String> {
    let game = Game::from_fen(fen, rules)?;
    let moves = legal_move_strings(&game, square.as_deref())?;

    if json {
        let response = MovesResponse {
            total: moves.len(),
            moves,
        };
        println!("{}", serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?);
    } else {
        println!("Legal moves ({}):", moves.len());
        for mv in &moves {
            println!("  {}", mv);
        }
    }
    Ok(())
}

fn run_check(fen: &str, json: bool, rules: RuleConfig) -> Result<(), String> {
    let game = Game::from_fen(fen, rules)?;
    let info = check_info(&game);

    if json {
        let response = ServerResponse::success_check(&game);
        println!("{}", serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?);
    } else {
        println!("Red in check:   {}", info.red);
        println!("Black in check: {}", info.black);
        println!("State: {}", game.game_state());
    }
    Ok(())
}

fn run_play(fen: &str, moves: &[String], json: bool, rules: RuleConfig) -> Result<(), String> {
    let mut game = Game::from_fen(fen, rules)?;
    let mut steps = Vec::with_capacity(moves.len());

    for mv in moves {
        let step = match parse_move(mv) {
            Ok((from, to)) => match game.try_move(from, to) {
                Ok(_) => PlayStep {
                    mv: mv.clone(),
                    applied: true,
                    reason: None,
                },
                Err(e) => PlayStep {
                    mv: mv.clone(),
                    applied: false,
                    reason: Some(e.to_string()),
                },
            },
            Err(e) => PlayStep {
                mv: mv.clone(),
                applied: false,
                reason: Some(e),
            },
        };
        steps.push(step);
    }

    if json {
        let response = PlayResponse {
            steps,
            fen: game.to_fen(),
            state: game.game_state(),
        };
        println!("{}", serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?);
    } else {
        for step in &steps {
            match &step.reason {
                None => println!("  {} ok", step.mv),
                Some(reason) => println!("  {} rejected ({})", step.mv, reason),
            }
        }
        println!("\n{}", game.board());
        println!("FEN: {}", game.to_fen());
        println!("State: {}", game.game_state());
    }
    Ok(())
}

/// Server 模式主循环
/// 逐行读取 JSON 请求，逐行写出 JSON 响应
fn run_server<R: BufRead, W: Write>(input: R, mut output: W, rules: RuleConfig) -> io::Result<()> {
    let mut game = Game::with_rules(rules);

    for line in input.lines() {
        let line = line?;

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ServerRequest>(&line) {
            Ok(request) if request.cmd == "quit" => break,
            Ok(request) => handle_request(&mut game, &request, rules),
            Err(e) => ServerResponse::error(&format!("Invalid JSON: {}", e)),
        };

        let text = serde_json::to_string(&response)
            .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{}\"}}", e));
        writeln!(output, "{}", text)?;
        output.flush()?;
    }

    Ok(())
}

fn handle_request(game: &mut Game, request: &ServerRequest, rules: RuleConfig) -> ServerResponse {
    match request.cmd.as_str() {
        "new" => match Game::from_fen(resolve_fen(request.fen.as_deref()), rules) {
            Ok(new_game) => {
                *game = new_game;
                ServerResponse::success_status(game)
            }
            Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
        },
        "move" => {
            let (from, to) = match (request.from.as_deref(), request.to.as_deref()) {
                (Some(from), Some(to)) => (from, to),
                _ => return ServerResponse::error("move requires 'from' and 'to'"),
            };
            let parsed = parse_square(from).and_then(|f| parse_square(to).map(|t| (f, t)));
            match parsed {
                Ok((from, to)) => match game.try_move(from, to) {
                    Ok(_) => ServerResponse::success_move(game, true, None),
                    Err(e) => ServerResponse::success_move(game, false, Some(e.to_string())),
                },
                Err(e) => ServerResponse::success_move(game, false, Some(e)),
            }
        }
        "moves" => match legal_move_strings(game, request.square.as_deref()) {
            Ok(moves) => ServerResponse::success_legal_moves(moves),
            Err(e) => ServerResponse::error(&e),
        },
        "check" => ServerResponse::success_check(game),
        "state" => ServerResponse::success_status(game),
        "board" => ServerResponse::success_board(game),
        _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
    }
}
