use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tate_bls::bls::BlsScheme;

/// Pedagogical BLS signatures over a small elliptic curve, via the reduced
/// Tate pairing.
#[derive(Parser)]
#[command(name = "tate-bls", about, version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign a message and print the resulting signature point.
    Sign(SchemeArgs),
    /// Verify a signature point against a message.
    Verify {
        #[command(flatten)]
        scheme: SchemeArgs,
        /// x-coordinate of the signature.
        #[arg(long)]
        sig_x: i64,
        /// y-coordinate of the signature.
        #[arg(long)]
        sig_y: i64,
    },
    /// Sign a message and print every intermediate value of the pipeline.
    Steps(SchemeArgs),
}

#[derive(clap::Args)]
struct SchemeArgs {
    /// Prime field characteristic.
    #[arg(long)]
    p: i64,
    /// Curve parameter A in y^2 = x^3 + Ax + B.
    #[arg(long = "a-coeff")]
    a: i64,
    /// Curve parameter B in y^2 = x^3 + Ax + B.
    #[arg(long = "b-coeff")]
    b: i64,
    /// Private key (signer's secret integer).
    #[arg(long)]
    key: i64,
    /// Message to sign or verify.
    message: String,
    /// Emit machine-readable JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Sign(args) => run_sign(args),
        Command::Verify { scheme, sig_x, sig_y } => run_verify(scheme, sig_x, sig_y),
        Command::Steps(args) => run_steps(args),
    }
}

fn build_scheme(args: &SchemeArgs) -> Result<BlsScheme> {
    BlsScheme::new(args.p, args.a, args.b, args.key).context("failed to set up the BLS scheme")
}

fn run_sign(args: SchemeArgs) -> Result<()> {
    let scheme = build_scheme(&args)?;
    let sig = scheme.sign(&args.message).context("failed to sign message")?;

    if args.json {
        let (x, y) = sig.coords().expect("a signature is never the point at infinity");
        println!(
            "{}",
            serde_json::json!({ "x": x.value().to_string(), "y": y.value().to_string() })
        );
    } else {
        println!("signature: {sig}");
    }
    Ok(())
}

fn run_verify(args: SchemeArgs, sig_x: i64, sig_y: i64) -> Result<()> {
    let scheme = build_scheme(&args)?;
    let sig = scheme
        .curve()
        .point(sig_x, sig_y)
        .context("signature coordinates are not on the curve")?;
    let ok = scheme
        .verify(&args.message, &sig)
        .context("failed to verify signature")?;

    if args.json {
        println!("{}", serde_json::json!({ "verified": ok }));
    } else {
        println!("verified: {ok}");
    }
    Ok(())
}

fn run_steps(args: SchemeArgs) -> Result<()> {
    let scheme = build_scheme(&args)?;
    let steps = scheme.steps(&args.message).context("failed to compute steps")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
    } else {
        println!("group_order:            {}", steps.group_order);
        println!("r:                      {}", steps.r);
        println!("cofactor:               {}", steps.cofactor);
        println!("embedding_degree:       {}", steps.embedding_degree);
        println!("irreducible_polynomial: {}", steps.irreducible_polynomial);
        println!("hash_point:             {}", steps.hash_point);
        println!("Q:                      {}", steps.q);
        println!("public_key:             {}", steps.public_key);
        println!("signature:              {}", steps.signature);
        println!("pairing_lhs:            {}", steps.pairing_lhs);
        println!("pairing_rhs:            {}", steps.pairing_rhs);
        println!("verified:               {}", steps.verified);
        println!("{}", steps.display_message);
    }
    Ok(())
}
