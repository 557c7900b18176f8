// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! EJBCA Command-Line Tool
//!
//! Exposes every client operation from the shell.
//!
//! # Usage
//!
//! ```text
//! ejbca-client [OPTIONS] <COMMAND>
//!
//! Commands:
//!   get-cert         Download a CA certificate (REST)
//!   cert-status      Query revocation status (REST)
//!   add-entity       Register an end entity (REST)
//!   delete-entity    Delete an end entity (REST)
//!   enroll-keystore  Enroll a server-generated keystore (REST)
//!   simple-enroll    Enroll a CSR (EST)
//!   ca-certs         Fetch the CA certificates (EST)
//!   ocsp-status      Query certificate status (OCSP)
//!   search-subject   Look a certificate up by subject (RFC 4387)
//!
//! Options:
//!   -c, --config <PATH>      Path to configuration file
//!   -s, --server <HOST>      Override the server hostname
//!       --alias <ALIAS>      Override the EST alias
//!       --ca-bundle <PATH>   PEM CA bundle for server verification
//!       --cert <PATH>        PEM client certificate
//!       --key <PATH>         PEM client key
//!   -k, --insecure           Do not verify the server certificate
//!       --trace              Dump every request and response
//!   -o, --output <PATH>      Write the result here instead of stdout
//!   -v, --verbose            Enable verbose output
//!   -q, --quiet              Suppress non-error output
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Fetch the EST CA chain and list its subjects
//! ejbca-client -s ca.example.com --ca-bundle ca.pem ca-certs --list
//!
//! # Enroll a CSR as a registration authority
//! ejbca-client -s ca.example.com --ca-bundle ca.pem simple-enroll \
//!     --csr device.b64 --ra --username device-42 --password foo123
//!
//! # Check a certificate over OCSP
//! ejbca-client -s ca.example.com ocsp-status --cert-file device.pem --issuer ca.pem
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use der::{Decode, DecodePem, EncodePem};
use ejbca_client::types::parse_certs_only;
use ejbca_client::{
    Certificate, ClientConfig, Credentials, EjbcaClient, EndEntity, EstEnrollOptions,
    ServerTarget, TokenType,
};
use tracing_subscriber::EnvFilter;
use x509_cert::name::Name;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// EJBCA Command-Line Tool
#[derive(Parser)]
#[command(name = "ejbca-client")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Talk to an EJBCA CA over REST, EST, OCSP and RFC 4387", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the server hostname
    #[arg(short, long, global = true, value_name = "HOST")]
    server: Option<String>,

    /// Override the EST alias
    #[arg(long, global = true, value_name = "ALIAS")]
    alias: Option<String>,

    /// PEM CA bundle for server verification
    #[arg(long, global = true, value_name = "PATH")]
    ca_bundle: Option<PathBuf>,

    /// PEM client certificate
    #[arg(long, global = true, value_name = "PATH")]
    cert: Option<PathBuf>,

    /// PEM client key
    #[arg(long, global = true, value_name = "PATH")]
    key: Option<PathBuf>,

    /// Do not verify the server certificate
    #[arg(short = 'k', long, global = true)]
    insecure: bool,

    /// Dump every request and response
    #[arg(long, global = true)]
    trace: bool,

    /// Write the result here instead of stdout
    #[arg(short, long, global = true, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a CA certificate (REST)
    GetCert {
        /// Subject DN of the CA
        #[arg(long, value_name = "DN")]
        subject: String,
    },

    /// Query revocation status (REST)
    CertStatus {
        /// Issuer DN
        #[arg(long, value_name = "DN")]
        issuer: String,

        /// Serial number in hex
        #[arg(long, value_name = "HEX")]
        serial: String,
    },

    /// Register an end entity (REST)
    AddEntity {
        /// Username
        #[arg(long)]
        username: String,

        /// Enrollment password
        #[arg(long)]
        password: String,

        /// Subject DN
        #[arg(long, value_name = "DN")]
        subject: String,

        /// Issuing CA name
        #[arg(long = "ca", value_name = "NAME")]
        ca_name: String,

        /// Certificate profile name
        #[arg(long, value_name = "NAME")]
        cert_profile: String,

        /// End-entity profile name
        #[arg(long, value_name = "NAME")]
        ee_profile: String,

        /// Token type (P12, JKS, PEM, BCFKS, USERGENERATED)
        #[arg(long, default_value = "P12")]
        token: TokenType,

        /// Subject alternative name
        #[arg(long)]
        san: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Extension data as NAME=VALUE (repeatable)
        #[arg(long = "ext", value_name = "NAME=VALUE")]
        extensions: Vec<String>,
    },

    /// Delete an end entity (REST)
    DeleteEntity {
        /// Username
        #[arg(long)]
        username: String,
    },

    /// Enroll a server-generated keystore (REST)
    EnrollKeystore {
        /// Username
        #[arg(long)]
        username: String,

        /// Enrollment password
        #[arg(long)]
        password: String,

        /// Key algorithm
        #[arg(long, default_value = "RSA")]
        key_alg: String,

        /// Key size or curve
        #[arg(long, default_value = "2048")]
        key_spec: String,

        /// Write the decoded keystore instead of its base64 text
        #[arg(long)]
        decode: bool,
    },

    /// Enroll a CSR (EST)
    SimpleEnroll {
        /// File holding the base64 PKCS#10 request
        #[arg(long, value_name = "PATH")]
        csr: PathBuf,

        /// Registration-authority mode (HTTP Basic auth)
        #[arg(long)]
        ra: bool,

        /// Basic auth username
        #[arg(long)]
        username: Option<String>,

        /// Basic auth password
        #[arg(long)]
        password: Option<String>,

        /// Post to this URL instead of the configured alias
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },

    /// Fetch the CA certificates (EST)
    CaCerts {
        /// Print the subjects instead of the PKCS#7 body
        #[arg(long)]
        list: bool,
    },

    /// Query certificate status (OCSP)
    OcspStatus {
        /// Certificate to check (PEM or DER)
        #[arg(long = "cert-file", value_name = "PATH")]
        cert_file: PathBuf,

        /// Issuer certificate (PEM or DER)
        #[arg(long, value_name = "PATH")]
        issuer: PathBuf,
    },

    /// Look a certificate up by subject (RFC 4387)
    SearchSubject {
        /// Subject DN
        #[arg(long, value_name = "DN")]
        subject: String,

        /// Hash the DN reduced to C, O, CN
        #[arg(long)]
        ldap_order: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Create runtime for async operations
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Run the command
    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_command(cli: Cli) -> CliResult<()> {
    let config = ClientConfig::load(cli.config.as_deref())?;
    let client = build_client(&cli, config.as_ref())?;
    let creds = build_credentials(&cli, config.as_ref())?;

    match &cli.command {
        Commands::GetCert { subject } => {
            let cert = client.rest().fetch_certificate(subject, &creds).await?;
            write_output(&cli, &cert)
        }
        Commands::CertStatus { issuer, serial } => {
            let serial = parse_serial(serial)?;
            let status = client
                .rest()
                .fetch_revocation_status(issuer, &serial, &creds)
                .await?;
            let text = match status.details() {
                None => "not revoked\n".to_string(),
                Some(details) => format!(
                    "revoked\nreason: {}\ndate: {}\n{}",
                    details.reason,
                    details.date.format("%Y-%m-%dT%H:%M:%SZ"),
                    details
                        .message
                        .as_deref()
                        .map(|m| format!("message: {}\n", m))
                        .unwrap_or_default()
                ),
            };
            write_output(&cli, text.as_bytes())
        }
        Commands::AddEntity {
            username,
            password,
            subject,
            ca_name,
            cert_profile,
            ee_profile,
            token,
            san,
            email,
            extensions,
        } => {
            let mut entity = EndEntity::new(username, password, subject, ca_name, cert_profile, ee_profile)
                .with_token(*token);
            if let Some(san) = san {
                entity = entity.with_san(san);
            }
            if let Some(email) = email {
                entity = entity.with_email(email);
            }
            for (name, value) in parse_extensions(extensions)? {
                entity = entity.with_extension(name, value);
            }

            client.rest().add_end_entity(&entity, &creds).await?;
            tracing::info!("Added end entity {}", username);
            Ok(())
        }
        Commands::DeleteEntity { username } => {
            client.rest().delete_end_entity(username, &creds).await?;
            tracing::info!("Deleted end entity {}", username);
            Ok(())
        }
        Commands::EnrollKeystore {
            username,
            password,
            key_alg,
            key_spec,
            decode,
        } => {
            let keystore = client
                .rest()
                .enroll_keystore(username, password, key_alg, key_spec, &creds)
                .await?;
            tracing::info!("Received {} keystore", keystore.format);
            if *decode {
                write_output(&cli, &keystore.decode_certificate()?)
            } else {
                write_output(&cli, &keystore.certificate)
            }
        }
        Commands::SimpleEnroll {
            csr,
            ra,
            username,
            password,
            url,
        } => {
            let csr = std::fs::read(csr)?;
            let mut options = EstEnrollOptions::new().ra_mode(*ra);
            if let Some(username) = username {
                options = options.username(username);
            }
            if let Some(password) = password {
                options = options.password(password);
            }
            if let Some(url) = url {
                options = options.url(url.parse()?);
            }

            let pkcs7 = client.est().simple_enroll(&csr, &creds, &options).await?;
            write_output(&cli, &pkcs7)
        }
        Commands::CaCerts { list } => {
            let pkcs7 = client.est().ca_certs(&creds).await?;
            if *list {
                let mut text = String::new();
                for cert in parse_certs_only(&pkcs7)? {
                    text.push_str(&cert.tbs_certificate.subject.to_string());
                    text.push('\n');
                }
                write_output(&cli, text.as_bytes())
            } else {
                write_output(&cli, &pkcs7)
            }
        }
        Commands::OcspStatus { cert_file, issuer } => {
            let cert = read_certificate(cert_file)?;
            let issuer = read_certificate(issuer)?;
            let status = client.ocsp().get_status(&cert, &issuer).await?;
            write_output(&cli, format!("{}\n", status).as_bytes())
        }
        Commands::SearchSubject { subject, ldap_order } => {
            let name = Name::from_str(subject)?;
            let cert = client.cert_store().search_by_subject(&name, *ldap_order).await?;
            let pem = cert.to_pem(der::pem::LineEnding::LF)?;
            write_output(&cli, pem.as_bytes())
        }
    }
}

fn build_client(cli: &Cli, config: Option<&ClientConfig>) -> CliResult<EjbcaClient> {
    let trace = cli.trace || config.map(|c| c.diagnostics.trace).unwrap_or(false);

    let target = match config {
        Some(config) => config.server_target_overriding(cli.server.as_deref(), cli.alias.as_deref())?,
        None => {
            let hostname = cli
                .server
                .clone()
                .ok_or("no server given: use --server or a configuration file")?;
            let mut builder = ServerTarget::builder().hostname(hostname);
            if let Some(ref alias) = cli.alias {
                builder = builder.est_alias(alias);
            }
            builder.build()?
        }
    };

    Ok(EjbcaClient::builder().target(target).trace(trace).build()?)
}

fn build_credentials(cli: &Cli, config: Option<&ClientConfig>) -> CliResult<Credentials> {
    let section = config.map(|c| c.credentials.clone()).unwrap_or_default();

    Ok(Credentials::new(
        section.verify && !cli.insecure,
        cli.ca_bundle.clone().or(section.ca_bundle),
        cli.cert.clone().or(section.client_cert),
        cli.key.clone().or(section.client_key),
    )?)
}

fn parse_serial(serial: &str) -> CliResult<Vec<u8>> {
    let digits = serial.trim().trim_start_matches("0x");
    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    Ok(hex::decode(padded)?)
}

fn parse_extensions(args: &[String]) -> CliResult<BTreeMap<String, String>> {
    let mut extensions = BTreeMap::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("extension '{}' is not NAME=VALUE", arg))?;
        extensions.insert(name.to_string(), value.to_string());
    }
    Ok(extensions)
}

fn read_certificate(path: &Path) -> CliResult<Certificate> {
    let data = std::fs::read(path)?;
    if data.starts_with(b"-----BEGIN") {
        Ok(Certificate::from_pem(&data)?)
    } else {
        Ok(Certificate::from_der(&data)?)
    }
}

fn write_output(cli: &Cli, data: &[u8]) -> CliResult<()> {
    match cli.output {
        Some(ref path) => {
            std::fs::write(path, data)?;
            tracing::info!("Wrote {} bytes to {}", data.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
