use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{Allocation, EntryKind, Inputs, Progress, SolveError, Step, Wizard, solve};

#[derive(Parser, Debug)]
#[command(
    name = "calc401k",
    about = "Rebalance traditional 401k and Roth IRA contributions after a raise",
    after_help = "Other modes:\n  calc401k wizard        answer the questions interactively\n  calc401k serve [port]  start the JSON API (default port 8080)"
)]
struct Cli {
    #[arg(long, help = "Current total yearly salary")]
    current_salary: f64,
    #[arg(
        long,
        help = "Percent of salary currently contributed to a traditional 401k, e.g. 10"
    )]
    traditional_percent: f64,
    #[arg(
        long,
        help = "Percent of salary currently contributed to a Roth IRA, e.g. 5"
    )]
    roth_percent: f64,
    #[arg(long, help = "New total yearly salary after the raise")]
    new_salary: f64,
    #[arg(long, default_value_t = false, help = "Print the result as JSON")]
    json: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SolvePayload {
    current_salary: Option<f64>,
    traditional_percent: Option<f64>,
    roth_percent: Option<f64>,
    new_salary: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveResponse {
    new_traditional_percent: f64,
    new_roth_percent: f64,
    new_take_home: f64,
    traditional_percent_display: i64,
    roth_percent_display: i64,
    take_home_display: String,
}

impl From<Allocation> for SolveResponse {
    fn from(value: Allocation) -> Self {
        SolveResponse {
            new_traditional_percent: value.new_traditional_percent,
            new_roth_percent: value.new_roth_percent,
            new_take_home: value.new_take_home,
            traditional_percent_display: whole_percent(value.new_traditional_percent),
            roth_percent_display: whole_percent(value.new_roth_percent),
            take_home_display: format_currency(value.new_take_home),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionResponse {
    step: u32,
    question: &'static str,
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn validate_percent(flag: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value.fract() != 0.0 || !(0.0..=100.0).contains(&value) {
        return Err(format!(
            "{flag} must be a whole number between 0 and 100"
        ));
    }
    Ok(())
}

fn build_inputs(cli: &Cli) -> Result<Inputs, String> {
    if !cli.current_salary.is_finite() || cli.current_salary <= 0.0 {
        return Err("--current-salary must be > 0".to_string());
    }

    if !cli.new_salary.is_finite() || cli.new_salary <= 0.0 {
        return Err("--new-salary must be > 0".to_string());
    }

    validate_percent("--traditional-percent", cli.traditional_percent)?;
    validate_percent("--roth-percent", cli.roth_percent)?;

    if cli.traditional_percent == 0.0 {
        return Err(
            "--traditional-percent must be > 0 to keep the Roth/traditional ratio".to_string(),
        );
    }

    Ok(Inputs {
        current_salary: cli.current_salary,
        current_traditional_percent: cli.traditional_percent / 100.0,
        current_roth_percent: cli.roth_percent / 100.0,
        new_salary: cli.new_salary,
    })
}

pub fn whole_percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

pub fn format_currency(amount: f64) -> String {
    // Half-way amounts round to even.
    let rounded = amount.round_ties_even() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("$ -{grouped}")
    } else {
        format!("$ {grouped}")
    }
}

fn render_report(allocation: &Allocation) -> String {
    format!(
        "Suggested traditional 401k: {} %\nSuggested Roth IRA: {} %\nNew take-home estimate: {}\n",
        whole_percent(allocation.new_traditional_percent),
        whole_percent(allocation.new_roth_percent),
        format_currency(allocation.new_take_home),
    )
}

pub fn run_cli<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let inputs = match build_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(msg) => {
            eprintln!("Input error: {msg}");
            return ExitCode::from(2);
        }
    };

    let allocation = match solve(&inputs) {
        Ok(allocation) => allocation,
        Err(err) => {
            eprintln!("Unable to compute a new allocation: {err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&SolveResponse::from(allocation)) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Failed to serialize result: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", render_report(&allocation));
    }
    ExitCode::SUCCESS
}

pub fn run_interactive() -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_wizard(stdin.lock(), stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Wizard I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Asks the wizard questions until a result is produced. Returns `None` when
/// input ends first. Unsolvable answers restart the questions.
pub fn run_wizard<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> io::Result<Option<Allocation>> {
    let mut wizard = Wizard::new();
    let mut line = String::new();

    loop {
        let step = wizard.step();
        write_prompt(&mut output, step)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }

        match wizard.submit(&line) {
            Ok(Progress::Next(_)) => {}
            Ok(Progress::Complete(inputs)) => match solve(&inputs) {
                Ok(allocation) => {
                    info!(
                        new_traditional_percent = allocation.new_traditional_percent,
                        new_roth_percent = allocation.new_roth_percent,
                        "wizard completed"
                    );
                    writeln!(output)?;
                    write!(output, "{}", render_report(&allocation))?;
                    output.flush()?;
                    return Ok(Some(allocation));
                }
                Err(err) => {
                    warn!(error = %err, "restarting wizard");
                    writeln!(output, "{err}. Let's start over.")?;
                }
            },
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

fn write_prompt<W: Write>(output: &mut W, step: Step) -> io::Result<()> {
    let unit = match step.kind() {
        EntryKind::Currency => "$",
        EntryKind::Percent => "%",
    };
    write!(output, "{} [{unit}] > ", step.question())?;
    output.flush()
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "calc401k HTTP API listening");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/api/solve", get(solve_get_handler).post(solve_post_handler))
        .route("/api/questions", get(questions_handler))
        .fallback(not_found_handler)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn questions_handler() -> Response {
    let questions: Vec<QuestionResponse> = Step::ALL
        .iter()
        .zip(1u32..)
        .map(|(step, index)| QuestionResponse {
            step: index,
            question: step.question(),
            kind: match step.kind() {
                EntryKind::Currency => "currency",
                EntryKind::Percent => "percent",
            },
        })
        .collect();
    json_response(StatusCode::OK, questions)
}

async fn solve_get_handler(query: Result<Query<SolvePayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => solve_response(payload),
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

async fn solve_post_handler(body: Result<Json<SolvePayload>, JsonRejection>) -> Response {
    match body {
        Ok(Json(payload)) => solve_response(payload),
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

fn solve_response(payload: SolvePayload) -> Response {
    let cli = match cli_from_payload(payload) {
        Ok(cli) => cli,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let inputs = match build_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match solve(&inputs) {
        Ok(allocation) => json_response(StatusCode::OK, SolveResponse::from(allocation)),
        Err(err) => solve_error_response(&err),
    }
}

fn solve_error_response(err: &SolveError) -> Response {
    let status = match err {
        SolveError::NoSolution(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SolveError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn cli_from_json(json: &str) -> Result<Cli, String> {
    let payload = serde_json::from_str::<SolvePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    cli_from_payload(payload)
}

fn cli_from_payload(payload: SolvePayload) -> Result<Cli, String> {
    fn required(value: Option<f64>, field: &str) -> Result<f64, String> {
        value.ok_or_else(|| format!("{field} is required"))
    }

    Ok(Cli {
        current_salary: required(payload.current_salary, "currentSalary")?,
        traditional_percent: required(payload.traditional_percent, "traditionalPercent")?,
        roth_percent: required(payload.roth_percent, "rothPercent")?,
        new_salary: required(payload.new_salary, "newSalary")?,
        json: true,
    })
}
