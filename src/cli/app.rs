// Command line application
// Parses options, wires files to the RSA core, and reports diagnostics

use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use crate::config::{KeyGenConfig, DEFAULT_BITS, DEFAULT_ITERS};
use crate::rsa::{
    decrypt_stream, encrypt_stream, generate_keypair, identity_to_int, read_private, read_public,
    write_private, write_public, RandState,
};
use crate::util::file_ops::{
    create_private_key_file, create_public_key_file, open_input, open_key_file, open_output,
};

#[derive(Parser, Debug)]
#[command(name = "textbook-rsa", version, about = "Textbook RSA key generation, encryption and decryption")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an RSA public/private key pair
    Keygen(KeygenArgs),
    /// Encrypt data with a public key
    Encrypt(EncryptArgs),
    /// Decrypt data with a private key
    Decrypt(DecryptArgs),
}

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Minimum bits needed for the public modulus n
    #[arg(short = 'b', long, default_value_t = DEFAULT_BITS)]
    pub bits: u64,

    /// Miller-Rabin iterations for testing primes
    #[arg(short = 'i', long, default_value_t = DEFAULT_ITERS)]
    pub iters: u64,

    /// Public key file
    #[arg(short = 'n', long = "pubkey", default_value = "rsa.pub")]
    pub pubkey: PathBuf,

    /// Private key file
    #[arg(short = 'd', long = "privkey", default_value = "rsa.priv")]
    pub privkey: PathBuf,

    /// Random seed (default: seconds since the UNIX epoch)
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Identity to sign into the public key
    #[arg(short = 'u', long, env = "USER")]
    pub user: String,

    /// Display verbose program output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Input file of data to encrypt (default: stdin)
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output file for encrypted data (default: stdout)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Public key file
    #[arg(short = 'n', long = "pubkey", default_value = "rsa.pub")]
    pub pubkey: PathBuf,

    /// Display verbose program output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Input file of data to decrypt (default: stdin)
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output file for decrypted data (default: stdout)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Private key file
    #[arg(short = 'd', long = "privkey", default_value = "rsa.priv")]
    pub privkey: PathBuf,

    /// Display verbose program output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Command {
    fn verbose(&self) -> bool {
        match self {
            Command::Keygen(args) => args.verbose,
            Command::Encrypt(args) => args.verbose,
            Command::Decrypt(args) => args.verbose,
        }
    }
}

/// Parse the process arguments and run the selected driver
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.command.verbose() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Keygen(args) => keygen(&args),
        Command::Encrypt(args) => encrypt(&args),
        Command::Decrypt(args) => decrypt(&args),
    }
}

fn default_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub fn keygen(args: &KeygenArgs) -> Result<()> {
    let config = KeyGenConfig::new(args.bits, args.iters);
    config.validate()?;
    // Fail before the slow part if the identity cannot be signed
    identity_to_int(&args.user).with_context(|| format!("cannot sign identity {:?}", args.user))?;

    let seed = args.seed.unwrap_or_else(default_seed);
    let mut rng = RandState::new(seed);
    log::debug!("seed = {}", seed);

    let key = generate_keypair(&config, &mut rng).context("key generation failed")?;
    let public = key
        .public_artifact(&args.user)
        .with_context(|| format!("cannot sign identity {:?}", args.user))?;

    // Existing key files are only replaced once there is a key to write
    let mut pbfile = create_public_key_file(&args.pubkey)
        .with_context(|| format!("cannot create public key file {}", args.pubkey.display()))?;
    let mut pvfile = create_private_key_file(&args.privkey)
        .with_context(|| format!("cannot create private key file {}", args.privkey.display()))?;

    write_public(&public, &mut pbfile)?;
    write_private(&key.private_key(), &mut pvfile)?;
    pbfile.flush()?;
    pvfile.flush()?;

    if args.verbose {
        eprintln!("user = {}", public.identity);
        eprintln!("s ({} bits) = {}", public.signature.bits(), public.signature);
        eprintln!("p ({} bits) = {}", key.p.bits(), key.p);
        eprintln!("q ({} bits) = {}", key.q.bits(), key.q);
        eprintln!("n ({} bits) = {}", key.n.bits(), key.n);
        eprintln!("e ({} bits) = {}", key.e.bits(), key.e);
        eprintln!("d ({} bits) = {}", key.d.bits(), key.d);
    }

    rng.clear();
    Ok(())
}

pub fn encrypt(args: &EncryptArgs) -> Result<()> {
    let pbfile = open_key_file(&args.pubkey)
        .with_context(|| format!("cannot open public key file {}", args.pubkey.display()))?;
    let public = read_public(pbfile)
        .with_context(|| format!("invalid public key file {}", args.pubkey.display()))?;

    if args.verbose {
        eprintln!("user = {}", public.identity);
        eprintln!("s ({} bits) = {}", public.signature.bits(), public.signature);
        eprintln!("n ({} bits) = {}", public.key.n.bits(), public.key.n);
        eprintln!("e ({} bits) = {}", public.key.e.bits(), public.key.e);
    }

    if !public.verify()? {
        bail!("unverified signature for user {:?}", public.identity);
    }

    let input = open_input(args.input.as_deref()).context("cannot open input")?;
    let mut output = open_output(args.output.as_deref()).context("cannot open output")?;
    encrypt_stream(input, &mut output, &public.key)?;
    output.flush()?;
    Ok(())
}

pub fn decrypt(args: &DecryptArgs) -> Result<()> {
    let pvfile = open_key_file(&args.privkey)
        .with_context(|| format!("cannot open private key file {}", args.privkey.display()))?;
    let private = read_private(pvfile)
        .with_context(|| format!("invalid private key file {}", args.privkey.display()))?;

    if args.verbose {
        eprintln!("n ({} bits) = {}", private.n.bits(), private.n);
        eprintln!("d ({} bits) = {}", private.d.bits(), private.d);
    }

    let input = open_input(args.input.as_deref()).context("cannot open input")?;
    let mut output = open_output(args.output.as_deref()).context("cannot open output")?;
    decrypt_stream(input, &mut output, &private)?;
    output.flush()?;
    Ok(())
}
