//! Shelf command-line client.
//!
//! A consumer of the gateway's HTTP contract: one subcommand per gateway
//! operation, plus a reachability probe. The loaded file listing is a
//! disposable snapshot; filtering happens client-side and the snapshot is
//! refetched rather than patched after mutations.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use shelf_core::RemoteFile;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf file gateway CLI")]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "SHELF_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored files, optionally filtered by a name substring
    List {
        /// Case-insensitive substring to filter on
        pattern: Option<String>,
    },
    /// Upload or overwrite a file (reads stdin when --file is not given)
    Upload {
        /// Name to store the file under
        name: String,
        /// Local file to read the content from
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Download a file (writes stdout when --output is not given)
    Download {
        /// Name of the stored file
        name: String,
        /// Local path to write the content to
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete a file permanently
    Delete {
        /// Name of the stored file
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Check whether the gateway is reachable
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.server.trim_end_matches('/').to_owned();
    let api = format!("{base}/api");

    match cli.command {
        Commands::List { pattern } => {
            let res = client
                .get(format!("{api}?list=1"))
                .send()
                .await
                .with_context(|| format!("could not reach the gateway at {base}"))?;
            if !res.status().is_success() {
                bail!(
                    "gateway error {}: {}",
                    res.status(),
                    res.text().await.unwrap_or_default()
                );
            }

            let all: Vec<RemoteFile> = res.json().await.context("invalid listing payload")?;
            let shown = filter_files(&all, pattern.as_deref());

            if shown.is_empty() {
                println!("No files found.");
            } else {
                for file in &shown {
                    println!(
                        "{:<9} {:>10}  {}",
                        short_sha(&file.sha),
                        fmt_size(file.size),
                        file.name
                    );
                }
                match pattern {
                    Some(_) => println!("{} of {} file(s)", shown.len(), all.len()),
                    None => println!("{} file(s)", shown.len()),
                }
            }
        }

        Commands::Upload { name, file } => {
            let content = match file {
                Some(path) => std::fs::read(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin()
                        .read_to_end(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };

            let res = client
                .post(file_url(&api, &name))
                .body(content)
                .send()
                .await
                .with_context(|| format!("could not reach the gateway at {base}"))?;
            report(res).await?;
        }

        Commands::Download { name, output } => {
            let res = client
                .get(file_url(&api, &name))
                .send()
                .await
                .with_context(|| format!("could not reach the gateway at {base}"))?;
            if !res.status().is_success() {
                bail!(
                    "gateway error {}: {}",
                    res.status(),
                    res.text().await.unwrap_or_default()
                );
            }

            let bytes = res.bytes().await.context("failed to read response body")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "{} ({}) -> {}",
                        name,
                        fmt_size(bytes.len() as u64),
                        path.display()
                    );
                }
                None => std::io::stdout().write_all(&bytes)?,
            }
        }

        Commands::Delete { name, yes } => {
            if !yes && !confirm(&name)? {
                println!("Cancelled.");
                return Ok(());
            }

            let res = client
                .delete(file_url(&api, &name))
                .send()
                .await
                .with_context(|| format!("could not reach the gateway at {base}"))?;
            report(res).await?;
        }

        Commands::Status => match client.get(format!("{base}/health")).send().await {
            Ok(res) if res.status().is_success() => println!("online: {base}"),
            Ok(res) => println!("degraded: gateway answered {}", res.status()),
            Err(_) => println!("offline: {base} is unreachable"),
        },
    }

    Ok(())
}

fn file_url(api: &str, name: &str) -> String {
    format!("{api}?name={}", urlencoding::encode(name))
}

/// Prints the gateway's reply, failing the command on error statuses.
async fn report(res: reqwest::Response) -> anyhow::Result<()> {
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    if status.is_success() {
        println!("{body}");
        Ok(())
    } else {
        bail!("gateway error {status}: {body}")
    }
}

/// Interactive arm/confirm step before a destructive delete.
fn confirm(name: &str) -> anyhow::Result<bool> {
    print!("Delete {name} forever? [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Client-side substring filter over a listing snapshot.
fn filter_files<'a>(files: &'a [RemoteFile], pattern: Option<&str>) -> Vec<&'a RemoteFile> {
    match pattern {
        Some(pattern) => {
            let needle = pattern.to_lowercase();
            files
                .iter()
                .filter(|f| f.name.to_lowercase().contains(&needle))
                .collect()
        }
        None => files.iter().collect(),
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Human-readable byte count.
fn fmt_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> RemoteFile {
        RemoteFile {
            name: name.into(),
            size: 1,
            sha: "0123456789abcdef".into(),
            entry_type: "file".into(),
        }
    }

    #[test]
    fn fmt_size_thresholds() {
        assert_eq!(fmt_size(0), "0 B");
        assert_eq!(fmt_size(1023), "1023 B");
        assert_eq!(fmt_size(1024), "1.0 KB");
        assert_eq!(fmt_size(1536), "1.5 KB");
        assert_eq!(fmt_size(1024 * 1024), "1.00 MB");
        assert_eq!(fmt_size(5 * 1024 * 1024 + 256 * 1024), "5.25 MB");
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let files = vec![file("Notes.txt"), file("report.pdf"), file("note-2.md")];

        let hits = filter_files(&files, Some("note"));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Notes.txt");
        assert_eq!(hits[1].name, "note-2.md");

        assert_eq!(filter_files(&files, Some("zzz")).len(), 0);
        assert_eq!(filter_files(&files, None).len(), 3);
    }

    #[test]
    fn short_sha_truncates_safely() {
        assert_eq!(short_sha("0123456789abcdef"), "0123456");
        assert_eq!(short_sha("abc"), "abc");
    }

    #[test]
    fn file_url_escapes_names() {
        assert_eq!(
            file_url("http://h/api", "read me.txt"),
            "http://h/api?name=read%20me.txt"
        );
    }
}
