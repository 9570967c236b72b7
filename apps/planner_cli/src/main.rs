use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings, DirectoryArtifactSink, HttpCatalogClient, Planner, PlannerSession,
    SubmissionStatus,
};
use shared::domain::{CampusName, CourseName, DegreeId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Build a timetable generation request against a catalog server")]
struct Cli {
    /// Settings file; defaults to ./planner.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DegreeArgs {
    #[arg(long = "degree", required = true)]
    degrees: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List campuses offered for the given degrees.
    Campuses {
        #[command(flatten)]
        degrees: DegreeArgs,
    },
    /// List courses offered for the given degrees at a campus.
    Courses {
        #[command(flatten)]
        degrees: DegreeArgs,
        #[arg(long)]
        campus: String,
    },
    /// Generate timetables and save the resulting archive.
    Generate {
        #[command(flatten)]
        degrees: DegreeArgs,
        #[arg(long)]
        campus: String,
        #[arg(long = "course", required = true)]
        courses: Vec<String>,
        /// Directory the archive is written to.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

type CliPlanner = Planner<HttpCatalogClient, DirectoryArtifactSink>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = HttpCatalogClient::from_settings(&settings)
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    let output = match &cli.command {
        Command::Generate { output, .. } => output.clone(),
        _ => None,
    }
    .or_else(|| settings.download_dir.clone())
    .unwrap_or_else(|| PathBuf::from("."));
    let session = PlannerSession::new(settings.degree_ids(), settings.dismiss_after());
    let mut planner = Planner::new(session, client, DirectoryArtifactSink::new(output));

    match cli.command {
        Command::Campuses { degrees } => {
            select_degrees(&mut planner, &degrees).await?;
            print_names(planner.session().campus_options(), cli.json)?;
        }
        Command::Courses { degrees, campus } => {
            select_degrees(&mut planner, &degrees).await?;
            select_campus(&mut planner, &campus).await?;
            print_names(planner.session().catalog(), cli.json)?;
        }
        Command::Generate {
            degrees,
            campus,
            courses,
            ..
        } => {
            select_degrees(&mut planner, &degrees).await?;
            select_campus(&mut planner, &campus).await?;
            for course in courses {
                let course = CourseName::from(course);
                if !planner.toggle_course(&course) {
                    bail!("course '{course}' is not offered at campus '{campus}'");
                }
            }

            let status = planner.submit().await?;
            let view = planner.session().view();
            let indicator = view
                .indicator
                .map(|indicator| indicator.text)
                .unwrap_or_default();
            match status {
                SubmissionStatus::Succeeded => {
                    println!("{indicator}");
                    if let Some(path) = planner.session().delivered_to() {
                        println!("saved {}", path.display());
                    }
                }
                _ => bail!("{indicator}"),
            }
        }
    }

    Ok(())
}

async fn select_degrees(planner: &mut CliPlanner, args: &DegreeArgs) -> Result<()> {
    for degree in &args.degrees {
        let degree = DegreeId::from(degree.as_str());
        // Toggling flips membership, so a repeated flag would deselect.
        if !planner.session().degrees().contains(&degree) {
            planner.toggle_degree(degree).await;
        }
    }
    if let Some(notice) = planner.session().notice() {
        bail!("{notice}");
    }
    Ok(())
}

async fn select_campus(planner: &mut CliPlanner, campus: &str) -> Result<()> {
    let campus = CampusName::from(campus);
    if !planner.session().campus_options().contains(&campus) {
        bail!("campus '{campus}' is not offered for the selected degrees");
    }
    planner.select_campus(Some(campus)).await;
    if let Some(notice) = planner.session().notice() {
        bail!("{notice}");
    }
    Ok(())
}

fn print_names<T: std::fmt::Display + serde::Serialize>(names: &[T], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(names)?);
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_accepts_repeated_degrees_and_courses() {
        let cli = Cli::try_parse_from([
            "timetable-planner",
            "generate",
            "--degree",
            "Computer Science",
            "--degree",
            "Bioinformatics",
            "--campus",
            "North",
            "--course",
            "Algorithms",
            "--course",
            "Networks",
        ])
        .expect("parse");
        match cli.command {
            Command::Generate {
                degrees, courses, ..
            } => {
                assert_eq!(degrees.degrees.len(), 2);
                assert_eq!(courses, vec!["Algorithms", "Networks"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn generate_requires_a_course() {
        assert!(Cli::try_parse_from([
            "timetable-planner",
            "generate",
            "--degree",
            "CS",
            "--campus",
            "North",
        ])
        .is_err());
    }
}
