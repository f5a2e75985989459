use argh::FromArgs;
use std::path::PathBuf;

use geninv::layout::{from_col_major, to_col_major};
use geninv::{InverseError, Norm, Svd};

mod input;

/// Computes generalized inverses of the matrix stored in a JSON file
#[derive(Debug, FromArgs)]
struct Args {
    /// path to a JSON file with `rows` and optional `params`
    #[argh(positional)]
    path: PathBuf,

    /// operation: inverse, pinv, svd, det or cond
    #[argh(option, short = 'm', default = "Mode::Inverse", from_str_fn(to_mode))]
    mode: Mode,

    /// norm of the condition number: frobenius or infinity
    #[argh(option, short = 'n', default = "Norm::Frobenius", from_str_fn(to_norm))]
    norm: Norm,

    /// singular value cutoff, overrides the one in the file
    #[argh(option, short = 't')]
    tolerance: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Inverse,
    Pinv,
    Svd,
    Det,
    Cond,
}

fn to_mode(value: &str) -> Result<Mode, String> {
    match value {
        "inverse" => Ok(Mode::Inverse),
        "pinv" => Ok(Mode::Pinv),
        "svd" => Ok(Mode::Svd),
        "det" => Ok(Mode::Det),
        "cond" => Ok(Mode::Cond),
        _ => Err(format!("Unsupported mode: {value}")),
    }
}

fn to_norm(value: &str) -> Result<Norm, String> {
    match value {
        "frobenius" | "f" => Ok(Norm::Frobenius),
        "infinity" | "i" => Ok(Norm::Infinity),
        _ => Err(format!("Unsupported norm: {value}")),
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Input(#[from] input::InputError),

    #[error(transparent)]
    Inverse(#[from] InverseError),

    #[error(transparent)]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Inverse(err) => err.status(),
            CliError::Input(_) | CliError::Output(_) => 64,
        }
    }
}

fn main() {
    env_logger::init();
    let args: Args = argh::from_env();

    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let input = input::read_input(&args.path)?;
    let mut params = input.params;
    if let Some(tol) = args.tolerance {
        params.tolerance = tol;
    }

    let (a, m, n) = to_col_major(&input.rows)?;
    log::debug!("read a {}x{} matrix from {:?}", m, n, args.path);

    let output = match args.mode {
        Mode::Inverse => {
            let mut ai = vec![0.0; n * m];
            geninv::general_inverse(&a, m, n, &params, &mut ai)?;
            serde_json::json!({ "inverse": from_col_major(&ai, n, m)? })
        }
        Mode::Pinv => {
            let mut ai = vec![0.0; n * m];
            let rank = geninv::pseudo_inverse(a, m, n, params.tolerance, &mut ai)?;
            serde_json::json!({ "pinv": from_col_major(&ai, n, m)?, "rank": rank })
        }
        Mode::Svd => {
            let dec = Svd::compute(a, m, n)?;
            serde_json::json!({
                "u": from_col_major(dec.u(), m, m)?,
                "s": dec.s(),
                "vt": from_col_major(dec.vt(), n, n)?,
                "rank": dec.rank(params.tolerance),
            })
        }
        Mode::Det => {
            if m != n {
                return Err(InverseError::UnsupportedSize(m, n).into());
            }
            serde_json::json!({ "det": geninv::determinant(&a, m)? })
        }
        Mode::Cond => {
            let cond = geninv::condition_number(&a, m, n, args.norm, &params)?;
            serde_json::json!({ "cond": cond })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
