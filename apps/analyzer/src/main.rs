use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_analyzer::config::Config;
use resume_analyzer::document::ResumeFile;
use resume_analyzer::gateway::{AnalysisGateway, HttpGateway, DEFAULT_TOP_K};
use resume_analyzer::models::ResumeData;
use resume_analyzer::presenter::{ResultPanel, ResultPresenter, ResultTab};
use resume_analyzer::store::{StoreEvent, WorkflowStore};
use resume_analyzer::workflow::{MatchForm, MatchOrchestrator, UploadOrchestrator};

#[derive(Parser)]
#[command(name = "resume-analyzer", version, about = "Analyze a résumé and match it against a job")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a résumé for analysis, then match it against a job
    Analyze {
        /// Résumé file (PDF, DOCX or plain text, up to 10 MiB)
        resume: PathBuf,

        /// Job title to match against
        #[arg(long)]
        title: String,

        #[command(flatten)]
        description: DescriptionArgs,

        #[arg(long)]
        company: Option<String>,

        /// Which result view to print
        #[arg(long, value_enum, default_value_t = ViewArg::All)]
        view: ViewArg,
    },
    /// List analyzed résumés
    List,
    /// Show one analyzed résumé
    Show { id: String },
    /// Delete an analyzed résumé
    Delete { id: String },
    /// Find the résumés that best fit a job description
    Candidates {
        #[command(flatten)]
        description: DescriptionArgs,

        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: u32,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct DescriptionArgs {
    /// Job description text
    #[arg(long)]
    description: Option<String>,

    /// Read the job description from a file
    #[arg(long)]
    description_file: Option<PathBuf>,
}

impl DescriptionArgs {
    async fn load(&self) -> Result<String> {
        match (&self.description, &self.description_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            (None, None) => anyhow::bail!("a job description is required"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Score,
    Gaps,
    Questions,
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "resume-analyzer v{} using {}",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url
    );

    let gateway: Arc<dyn AnalysisGateway> =
        Arc::new(HttpGateway::new(&config).context("Failed to build HTTP client")?);

    match cli.command {
        Commands::Analyze {
            resume,
            title,
            description,
            company,
            view,
        } => {
            let form = MatchForm {
                job_title: title,
                job_description: description.load().await?,
                company: company.unwrap_or_default(),
            };
            analyze(gateway, &resume, &form, view).await
        }
        Commands::List => {
            let resumes = gateway.list_resumes().await?;
            if resumes.is_empty() {
                println!("No résumés analyzed yet.");
            }
            for resume in &resumes {
                println!(
                    "{}  {}  {}  ({} skills)",
                    resume.id,
                    resume.created_at.format("%Y-%m-%d %H:%M"),
                    resume.file_name,
                    resume.extracted_skills.total_skills()
                );
            }
            Ok(())
        }
        Commands::Show { id } => {
            print_resume(&gateway.get_resume(&id).await?);
            Ok(())
        }
        Commands::Delete { id } => {
            gateway.delete_resume(&id).await?;
            println!("Deleted {id}");
            Ok(())
        }
        Commands::Candidates { description, top_k } => {
            let job_description = description.load().await?;
            let candidates = gateway.find_candidates(&job_description, top_k).await?;
            if candidates.is_empty() {
                println!("No matching candidates.");
            }
            for (rank, candidate) in candidates.iter().enumerate() {
                println!("{}. {}", rank + 1, serde_json::to_string_pretty(candidate)?);
            }
            Ok(())
        }
    }
}

async fn analyze(
    gateway: Arc<dyn AnalysisGateway>,
    path: &Path,
    form: &MatchForm,
    view: ViewArg,
) -> Result<()> {
    let store = WorkflowStore::new();
    let uploads = UploadOrchestrator::new(store.clone(), gateway.clone());
    let matcher = MatchOrchestrator::new(store.clone(), gateway);
    let mut presenter = ResultPresenter::new(store.clone());

    let file = ResumeFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    uploads.select_file(file)?;

    let progress = tokio::spawn(log_progress(store.clone()));
    let uploaded = uploads.submit().await;
    progress.abort();
    let resume = uploaded?;
    print_resume(&resume);

    let result = matcher.submit(form).await?;
    info!("Match {} complete", result.id);

    let panels = match view {
        ViewArg::All => presenter.render_all(),
        ViewArg::Score => render_tab(&mut presenter, ResultTab::Score),
        ViewArg::Gaps => render_tab(&mut presenter, ResultTab::Gaps),
        ViewArg::Questions => render_tab(&mut presenter, ResultTab::Questions),
    };
    for panel in &panels {
        print_panel(panel);
    }
    Ok(())
}

fn render_tab(presenter: &mut ResultPresenter, tab: ResultTab) -> Vec<ResultPanel> {
    presenter.select_tab(tab);
    presenter.render().into_iter().collect()
}

async fn log_progress(store: WorkflowStore) {
    let mut events = store.subscribe();
    loop {
        match events.recv().await {
            Ok(StoreEvent::ProgressChanged(p)) if store.is_uploading() => {
                info!("Analyzing résumé… {p}%");
            }
            Ok(_) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => break,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_resume(resume: &ResumeData) {
    let skills = &resume.extracted_skills;
    println!("Résumé {} ({})", resume.id, resume.file_name);
    if let Some(role) = &skills.current_role {
        println!("  Current role: {role}");
    }
    if let Some(years) = skills.years_of_experience {
        println!("  Experience: {years} years");
    }
    for category in skills.categories() {
        println!("  {}: {}", category.label, category.skills.join(", "));
    }
    if let Some(education) = skills.education.as_deref().filter(|e| !e.is_empty()) {
        println!("  Education: {}", education.join("; "));
    }
    if let Some(certs) = skills.certifications.as_deref().filter(|c| !c.is_empty()) {
        println!("  Certifications: {}", certs.join(", "));
    }
    println!();
}

fn print_panel(panel: &ResultPanel) {
    match panel {
        ResultPanel::Score(summary) => {
            println!("== Score ==");
            println!("{}: {}% ({})", summary.job_title, summary.score, summary.rating);
            println!(
                "  {} matched skills, {} skills to improve",
                summary.matched_skills, summary.skills_to_improve
            );
        }
        ResultPanel::Gaps(gaps) => {
            println!("== Skill gaps ==");
            println!("  Matched: {}", gaps.matched.join(", "));
            println!("  Partial: {}", gaps.partial.join(", "));
            println!("  Missing: {}", gaps.missing.join(", "));
            println!("  Match rate: {}% of {} required skills", gaps.match_rate, gaps.total);
        }
        ResultPanel::Questions(view) => {
            println!("== Interview questions ==");
            for item in &view.questions {
                println!("  {}. {}", item.number, item.text);
            }
            if !view.recommendations.is_empty() {
                println!("  Recommendations:");
                for rec in &view.recommendations {
                    println!("  - {rec}");
                }
            }
        }
    }
    println!();
}
