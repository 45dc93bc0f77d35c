use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use remote_sign_core::RemoteSignCore;
use remote_sign_core::model::algorithm::{
    HashAlgorithm, Provider, SignatureFormat, SignatureLevel, SignatureNiveau,
    SignaturePackaging, SignatureProfile,
};
use remote_sign_core::model::unit::ContentKind;
use remote_sign_core::service::signing::dto::{SignerDTO, SigningInputDTO, SigningRequestDTO};
use tokio_util::sync::CancellationToken;

use crate::CliConfig;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the seals available at the provider
    Seals,
    /// Show state and certificates of a user
    User { user_id: String },
    /// Seal the digest of a file
    SealHash(SigningArgs),
    /// Sign the digest of a file as a user
    SignHash(SigningArgs),
    /// Upload a file and seal it at the provider
    SealDocument(SigningArgs),
    /// Upload a file and sign it as a user
    SignDocument(SigningArgs),
    /// Seal the locally built data to be signed of a file
    SealTbs(SigningArgs),
    /// Sign the locally built data to be signed of a file as a user
    SignTbs(SigningArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SigningArgs {
    pub file: PathBuf,
    /// Seal or user identifier, defaults to the configured one
    #[arg(long)]
    pub signer: Option<String>,
    #[arg(long)]
    pub level: Option<SignatureLevel>,
    #[arg(long)]
    pub hash_algorithm: Option<HashAlgorithm>,
    /// CADES or PADES, PADES signatures are embedded into the PDF
    #[arg(long)]
    pub format: Option<SignatureFormat>,
}

pub async fn run(
    command: Command,
    provider: Option<Provider>,
    core: &RemoteSignCore,
    config: &CliConfig,
    cancellation: &CancellationToken,
) -> anyhow::Result<()> {
    let provider = provider
        .or(config.provider)
        .context("No provider given or configured")?;
    let service = &core.signing_service;

    match &command {
        Command::Seals => {
            for seal in service.list_seals(provider).await? {
                println!(
                    "{}\t{}\t{}",
                    seal.seal_id,
                    seal.organization.unwrap_or_default(),
                    seal.valid_until.unwrap_or_default()
                );
            }
        }
        Command::User { user_id } => {
            let user = service.get_user(provider, user_id).await?;
            println!("state: {}", user.state);
            for certificate in service.get_user_certificates(provider, user_id).await? {
                let algorithms = certificate
                    .signature_algorithms
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "certificate {}: {} [{algorithms}]",
                    certificate
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    certificate.niveau
                );
            }
        }
        Command::SealHash(args)
        | Command::SignHash(args)
        | Command::SealDocument(args)
        | Command::SignDocument(args)
        | Command::SealTbs(args)
        | Command::SignTbs(args) => {
            let content = tokio::fs::read(&args.file)
                .await
                .with_context(|| format!("Failed reading {}", args.file.display()))?;

            let request = build_request(&command, provider, config, content)?;
            let result = service.sign(request, cancellation).await?;

            for artifact in result.artifacts {
                let path = artifact_path(&args.file, artifact.packaging);
                tokio::fs::write(&path, &artifact.bytes)
                    .await
                    .with_context(|| format!("Failed writing {}", path.display()))?;

                println!(
                    "{}: {} ({})",
                    path.display(),
                    artifact.indication,
                    result.parameters.signature_algorithm
                );
            }
        }
    }

    Ok(())
}

pub fn build_request(
    command: &Command,
    provider: Provider,
    config: &CliConfig,
    content: Vec<u8>,
) -> anyhow::Result<SigningRequestDTO> {
    let (args, kind, signer) = match command {
        Command::SealHash(args) => (args, ContentKind::DocumentHash, seal(args, config)?),
        Command::SignHash(args) => (args, ContentKind::DocumentHash, user(args, config)?),
        Command::SealDocument(args) => (args, ContentKind::Document, seal(args, config)?),
        Command::SignDocument(args) => (args, ContentKind::Document, user(args, config)?),
        Command::SealTbs(args) => (args, ContentKind::ToBeSigned, seal(args, config)?),
        Command::SignTbs(args) => (args, ContentKind::ToBeSigned, user(args, config)?),
        Command::Seals | Command::User { .. } => {
            anyhow::bail!("Command {command:?} does not sign")
        }
    };

    let format = args.format.unwrap_or(SignatureFormat::Cades);
    let packaging = match (format, kind) {
        (SignatureFormat::Pades, _) => SignaturePackaging::Enveloped,
        (SignatureFormat::Cades, ContentKind::Document) => SignaturePackaging::Enveloping,
        (SignatureFormat::Cades, _) => SignaturePackaging::Detached,
    };

    Ok(SigningRequestDTO {
        provider,
        signer,
        kind,
        niveau: config.niveau.unwrap_or(SignatureNiveau::Qualified),
        hash_algorithm: args.hash_algorithm,
        signature_algorithm: None,
        profile: SignatureProfile {
            level: args.level.or(config.level).unwrap_or(SignatureLevel::BB),
            format,
            packaging,
        },
        inputs: vec![SigningInputDTO {
            content,
            origin: args
                .file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            visual: None,
        }],
    })
}

fn seal(args: &SigningArgs, config: &CliConfig) -> anyhow::Result<SignerDTO> {
    let seal_id = args
        .signer
        .as_ref()
        .or(config.seal_id.as_ref())
        .context("No seal given or configured")?;

    Ok(SignerDTO::Seal {
        seal_id: seal_id.to_owned(),
    })
}

fn user(args: &SigningArgs, config: &CliConfig) -> anyhow::Result<SignerDTO> {
    let user_id = args
        .signer
        .as_ref()
        .or(config.user_id.as_ref())
        .context("No user given or configured")?;

    Ok(SignerDTO::User {
        user_id: user_id.to_owned(),
        certificate_id: None,
        redirect_after_page_visit_url: None,
    })
}

/// Artifact lands next to the input, enveloped documents keep their extension
pub fn artifact_path(input: &Path, packaging: SignaturePackaging) -> PathBuf {
    let file_name = match packaging {
        SignaturePackaging::Enveloped => {
            let mut name = input.file_stem().unwrap_or_default().to_os_string();
            name.push("_signed");
            if let Some(extension) = input.extension() {
                name.push(".");
                name.push(extension);
            }
            name
        }
        SignaturePackaging::Enveloping => with_suffix(input, ".p7s"),
        SignaturePackaging::Detached => with_suffix(input, ".sig"),
    };
    input.with_file_name(file_name)
}

fn with_suffix(input: &Path, suffix: &str) -> OsString {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    name
}
