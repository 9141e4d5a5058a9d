use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use clap::{Args, Parser, Subcommand};
use indicatif::MultiProgress;
use rayon::prelude::*;
use sweetbox::config::{APP_NAME, ARGON_MEMORY, ARGON_THREADS, ARGON_TIME, PASSWORD_MIN_LENGTH, ZSTD_LEVEL};
use sweetbox::{Algorithm, Compression, File, Kdf, KdfParams, Mode, Options, Processor, Secret};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::ui::display::{show_error, show_header, show_success};
use crate::ui::progress::Bar;
use crate::ui::prompt::Prompt;

/// Paths and password shared by encrypt and decrypt.
#[derive(Args)]
pub struct Target {
    /// Files to process. Several files are handled in parallel.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path (only with a single input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Password (prompted for when omitted).
    #[arg(short, long)]
    password: Option<String>,

    /// Replace existing output files.
    #[arg(short, long)]
    force: bool,
}

/// Choices recorded in new containers.
#[derive(Args)]
pub struct Sealing {
    /// AEAD algorithm.
    #[arg(long, default_value_t = Algorithm::Aes256Gcm)]
    algorithm: Algorithm,

    /// Key derivation function.
    #[arg(long, default_value_t = Kdf::Argon2id)]
    kdf: Kdf,

    /// KDF memory cost in KiB.
    #[arg(long, default_value_t = ARGON_MEMORY)]
    memory: u32,

    /// KDF time cost.
    #[arg(long, default_value_t = ARGON_TIME)]
    iterations: u32,

    /// KDF lanes.
    #[arg(long, default_value_t = ARGON_THREADS)]
    parallelism: u32,

    /// Compress with zstd before encrypting.
    #[arg(long)]
    compress: bool,

    /// zstd level.
    #[arg(long, default_value_t = ZSTD_LEVEL, allow_negative_numbers = true)]
    level: i32,

    /// Do not record the input file name in the header.
    #[arg(long)]
    no_filename: bool,
}

impl Sealing {
    fn options(&self) -> Options {
        Options {
            algorithm: self.algorithm,
            kdf: self.kdf,
            kdf_params: KdfParams::new(self.memory, self.iterations, self.parallelism),
            compression: if self.compress { Compression::Zstd } else { Compression::None },
            level: self.level,
            store_filename: !self.no_filename,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt files into .swb containers.
    Encrypt {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        sealing: Sealing,
    },

    /// Decrypt .swb containers.
    Decrypt {
        #[command(flatten)]
        target: Target,
    },

    /// Show a container's header without decrypting it.
    Inspect {
        input: PathBuf,
    },
}

#[derive(Parser)]
#[command(name = APP_NAME, version, about = "Password-based file encryption with AES-256-GCM, ChaCha20-Poly1305 or XChaCha20-Poly1305 and Argon2.")]
pub struct App {
    #[command(subcommand)]
    command: Commands,
}

/// One input and where its result goes.
#[derive(Debug)]
struct Job {
    input: File,
    output: File,
}

impl Job {
    fn plan(mode: Mode, input: PathBuf, output: Option<PathBuf>) -> Result<Self> {
        let input = File::new(input);
        input.validate()?;

        let output = match (output, mode) {
            (Some(path), _) => path,
            (None, Mode::Encrypt) => input.output_path(mode, None),
            (None, Mode::Decrypt) if input.is_encrypted() => input.output_path(mode, None),
            (None, Mode::Decrypt) => {
                let inspection = Processor::inspect(&input)?;
                input.output_path(mode, inspection.header.filename())
            }
        };

        Ok(Self { input, output: File::new(output) })
    }

    fn label(&self) -> String {
        self.input.file_name().unwrap_or_else(|| self.input.path().display().to_string())
    }
}

impl App {
    pub fn init() -> Result<Self> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(Self::parse())
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Encrypt { target, sealing } => Self::run_batch(Mode::Encrypt, target, sealing.options()),
            Commands::Decrypt { target } => Self::run_batch(Mode::Decrypt, target, Options::default()),
            Commands::Inspect { input } => {
                let inspection = Processor::inspect(&File::new(&input)).with_context(|| format!("inspect failed: {}", input.display()))?;
                show_header(&input, &inspection);
                Ok(())
            }
        }
    }

    fn run_batch(mode: Mode, target: Target, options: Options) -> Result<()> {
        let Target { inputs, output, password, force } = target;
        ensure!(output.is_none() || inputs.len() == 1, "--output can only be used with a single input");

        if mode == Mode::Encrypt {
            options.validate()?;
        }

        let jobs = inputs.into_iter().map(|input| Job::plan(mode, input, output.clone())).collect::<Result<Vec<_>>>()?;
        Self::check_outputs(&jobs, force)?;

        let password = match password {
            Some(password) => Secret::from_string(password),
            None => Prompt::new(PASSWORD_MIN_LENGTH).password(mode)?,
        };

        debug!(%mode, files = jobs.len(), "starting batch");
        let multi = MultiProgress::new();
        let results: Vec<Result<()>> = jobs.par_iter().map(|job| Self::process(mode, job, &password, options, &multi)).collect();

        let mut failures = Vec::new();
        for (job, result) in jobs.iter().zip(results) {
            match result {
                Ok(()) => show_success(mode, job.input.path(), job.output.path()),
                Err(err) => failures.push(err),
            }
        }

        let mut failures = failures.into_iter();
        match failures.next() {
            None => Ok(()),
            Some(first) => {
                for err in failures {
                    show_error(&err);
                }
                Err(first)
            }
        }
    }

    fn process(mode: Mode, job: &Job, password: &Secret, options: Options, multi: &MultiProgress) -> Result<()> {
        let bar = Bar::new(multi, &job.label());
        let processor = Processor::new(password.clone()).with_options(options).with_progress(&bar);

        let result = match mode {
            Mode::Encrypt => processor.encrypt(&job.input, &job.output),
            Mode::Decrypt => processor.decrypt(&job.input, &job.output),
        };

        bar.finish(result.is_ok());
        result.map(|_| ()).with_context(|| format!("{} failed: {}", mode.label().to_lowercase(), job.input.path().display()))
    }

    /// Refuses to clobber existing files or write two results to one path.
    fn check_outputs(jobs: &[Job], force: bool) -> Result<()> {
        let mut seen = HashSet::new();
        for job in jobs {
            let path = job.output.path();
            if path == job.input.path() {
                bail!("output would overwrite its own input: {}", path.display());
            }

            if !seen.insert(path) {
                bail!("several inputs would be written to {}", path.display());
            }

            if job.output.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
        }

        Ok(())
    }
}

/// Process exit code for a failed run.
///
/// Library errors keep their category's code anywhere in the context chain;
/// everything else exits with 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain().find_map(|cause| cause.downcast_ref::<sweetbox::Error>()).map_or(1, |e| e.kind().exit_code())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_exit_code_follows_library_error_through_context() {
        let err = anyhow::Error::new(sweetbox::Error::AuthenticationFailed).context("decrypt failed: a.swb");
        assert_eq!(exit_code(&err), 6);

        let err = anyhow::Error::new(sweetbox::Error::NotFound { path: PathBuf::from("missing") });
        assert_eq!(exit_code(&err), 2);

        assert_eq!(exit_code(&anyhow::anyhow!("operation canceled")), 1);
    }

    #[test]
    fn test_cli_parses_sealing_flags() {
        let app = App::try_parse_from(["sweetbox", "encrypt", "a.txt", "--algorithm", "XChaCha20-Poly1305", "--kdf", "argon2i", "--memory", "1024", "--compress", "--level", "-5", "--no-filename"]).unwrap();
        let Commands::Encrypt { target, sealing } = app.command else { panic!("expected encrypt") };

        let options = sealing.options();
        assert_eq!(target.inputs, vec![PathBuf::from("a.txt")]);
        assert_eq!(options.algorithm, Algorithm::XChaCha20Poly1305);
        assert_eq!(options.kdf, Kdf::Argon2i);
        assert_eq!(options.kdf_params.memory_kib, 1024);
        assert_eq!(options.compression, Compression::Zstd);
        assert_eq!(options.level, -5);
        assert!(!options.store_filename);
    }

    #[test]
    fn test_cli_rejects_unknown_algorithm() {
        assert!(App::try_parse_from(["sweetbox", "encrypt", "a.txt", "--algorithm", "rot13"]).is_err());
    }

    #[test]
    fn test_plan_reports_missing_input_first() {
        let dir = tempfile::tempdir().unwrap();
        let err = Job::plan(Mode::Encrypt, dir.path().join("absent.txt"), None).unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_existing_output_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.txt");
        std::fs::write(&input, b"plain").unwrap();
        std::fs::write(dir.path().join("a.txt.swb"), b"old").unwrap();

        let jobs = vec![Job::plan(Mode::Encrypt, input, None).unwrap()];
        assert!(App::check_outputs(&jobs, false).is_err());
        assert!(App::check_outputs(&jobs, true).is_ok());
    }

    #[test]
    fn test_duplicate_outputs_are_rejected() {
        let jobs = vec![
            Job { input: File::new("a"), output: File::new(Path::new("same.out")) },
            Job { input: File::new("b"), output: File::new(Path::new("same.out")) },
        ];
        assert!(App::check_outputs(&jobs, true).is_err());
    }
}
