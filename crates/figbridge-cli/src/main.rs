//! figbridge - serialize a scene document the way the design-tool plugin does.
//!
//! The scene is read from a JSON file, converted by the same controller the
//! plugin runs, and every upload request is answered locally by writing the
//! decoded PNG into the output directory. The resulting `selection-data`
//! message is printed to stdout.
//!
//! # Usage
//!
//! ```bash
//! figbridge scene.json
//! figbridge scene.json --out assets/ --options options.json --save-to-file
//! RUST_LOG=figbridge_serialize=debug figbridge scene.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use figbridge_bridge::{encode, PluginMessage, UploadRequest, UploadResponse};
use figbridge_core::{DocumentNode, FigbridgeError};
use figbridge_serialize::{DocumentExporter, PluginController, SerializeOptions};
use futures::channel::mpsc;
use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid options file: {0}")]
    Options(#[from] serde_json::Error),

    #[error(transparent)]
    Figbridge(#[from] FigbridgeError),

    #[error("Conversion failed: {0}")]
    Conversion(String),
}

/// Command line configuration.
#[derive(Debug, Clone)]
struct CliConfig {
    scene_path: PathBuf,
    options_path: Option<PathBuf>,
    out_dir: PathBuf,
    save_to_file: bool,
}

fn print_help() {
    println!("figbridge - serialize a design scene document");
    println!();
    println!("USAGE:");
    println!("    figbridge <SCENE.json> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -o, --out <DIR>        Directory for uploaded images [default: figbridge-assets]");
    println!("    --options <FILE>       Serializer options as JSON");
    println!("    --save-to-file         Set saveToFile on the conversion request");
    println!("    -h, --help             Print this help");
    println!("    -V, --version          Print version");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG               Log filter [default: info]");
}

fn parse_args(args: &[String]) -> Result<CliConfig, CliError> {
    let mut scene_path = None;
    let mut options_path = None;
    let mut out_dir = PathBuf::from("figbridge-assets");
    let mut save_to_file = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("figbridge {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--out" | "-o" => {
                i += 1;
                let dir = args
                    .get(i)
                    .ok_or_else(|| CliError::Usage("--out needs a directory".into()))?;
                out_dir = PathBuf::from(dir);
            }
            "--options" => {
                i += 1;
                let file = args
                    .get(i)
                    .ok_or_else(|| CliError::Usage("--options needs a file".into()))?;
                options_path = Some(PathBuf::from(file));
            }
            "--save-to-file" => save_to_file = true,
            arg if arg.starts_with('-') => {
                return Err(CliError::Usage(format!("Unknown argument: {arg}")));
            }
            path => {
                if scene_path.replace(PathBuf::from(path)).is_some() {
                    return Err(CliError::Usage("Only one scene file can be given".into()));
                }
            }
        }
        i += 1;
    }

    let scene_path =
        scene_path.ok_or_else(|| CliError::Usage("Missing scene file (see --help)".into()))?;
    Ok(CliConfig {
        scene_path,
        options_path,
        out_dir,
        save_to_file,
    })
}

async fn read_file(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Store one upload request in `out_dir` and build the matching response.
async fn store_upload(out_dir: &Path, request: UploadRequest) -> UploadResponse {
    let bytes = match BASE64.decode(request.data.as_bytes()) {
        Ok(bytes) => bytes,
        Err(err) => return UploadResponse::failed(request.id, format!("invalid base64: {err}")),
    };
    let path = out_dir.join(&request.name);
    match tokio::fs::write(&path, &bytes).await {
        Ok(()) => {
            debug!(path = %path.display(), size = bytes.len(), "stored upload");
            UploadResponse::stored(request.id, request.name)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to store upload");
            UploadResponse::failed(request.id, err.to_string())
        }
    }
}

async fn run(config: CliConfig) -> Result<(), CliError> {
    let options = match &config.options_path {
        Some(path) => SerializeOptions::from_json(&read_file(path).await?)?,
        None => SerializeOptions::default(),
    };
    let scene = DocumentNode::from_json(&read_file(&config.scene_path).await?)
        .map_err(FigbridgeError::from)?;
    info!(
        path = %config.scene_path.display(),
        nodes = scene.descendants().len(),
        "loaded scene"
    );

    tokio::fs::create_dir_all(&config.out_dir)
        .await
        .map_err(|source| CliError::Io {
            path: config.out_dir.clone(),
            source,
        })?;

    let (tx, mut rx) = mpsc::unbounded();
    let controller = PluginController::new(DocumentExporter::new(), tx).with_options(options);
    let selection = std::slice::from_ref(&scene);

    let converting = controller.convert_selection(selection, config.save_to_file);
    let answering = async {
        while let Some(message) = rx.next().await {
            match message {
                PluginMessage::UploadRequest(request) => {
                    let response = store_upload(&config.out_dir, request).await;
                    controller.coordinator().resolve(response);
                }
                other => return Some(other),
            }
        }
        None
    };
    let (posted, outcome) = futures::join!(converting, answering);
    posted.map_err(FigbridgeError::from)?;

    match outcome {
        Some(PluginMessage::SelectionData(payload)) => {
            info!(assets = payload.assets.len(), "conversion complete");
            let json = encode(&PluginMessage::SelectionData(payload))
                .map_err(FigbridgeError::from)?;
            let mut stdout = tokio::io::stdout();
            let written = async {
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await
            };
            written.await.map_err(|source| CliError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })
        }
        Some(PluginMessage::Error { message }) => Err(CliError::Conversion(message)),
        _ => Err(CliError::Conversion("no result was posted".into())),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match parse_args(&args) {
        Ok(config) => run(config).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
