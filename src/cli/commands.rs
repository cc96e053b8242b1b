//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::merge_interactor::MergeRequest;
use crate::app::report::{render, ReportFormat};
use crate::cli::args::{AssessArgs, BatchArgs, CandidatesArgs, DedupeArgs, MergeArgs};
use crate::cli::Commands;
use crate::domain::model::CodecObservation;
use crate::ports::AnalysisConfig;
use crate::utils::path::{split_list, DEFAULT_MEDIA_EXTENSIONS};

/// Dispatch a parsed command
pub async fn run(
    container: &DefaultAppContainer,
    config: &AnalysisConfig,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Assess(args) => assess(container, args).await,
        Commands::Batch(args) => batch(container, args).await,
        Commands::Merge(args) => merge(container, config, args).await,
        Commands::Dedupe(args) => dedupe(container, config, args).await,
        Commands::Candidates(args) => candidates(container, config, args).await,
    }
}

/// Execute the assess command
pub async fn assess(container: &DefaultAppContainer, args: AssessArgs) -> Result<()> {
    let format = ReportFormat::parse(&args.format)?;
    let interactor = container.assess_interactor();

    let mut response = match (&args.input, &args.video_codec) {
        (Some(input), _) => interactor
            .assess_file(input)
            .await
            .with_context(|| format!("Failed to assess {}", input))?,
        (None, Some(video_codec)) => {
            let observation = CodecObservation::new(
                video_codec,
                args.audio_codec.as_deref().unwrap_or_default(),
                args.container.as_deref().unwrap_or_default(),
            );
            interactor.assess_observation("manual", observation).await
        }
        (None, None) => anyhow::bail!("Either --input or --video-codec is required"),
    };

    if let Some(output) = &args.plan {
        response.plan_conversion(output);
    }

    info!("Assessment tier: {}", response.assessment.tier);
    println!("{}", render(&response, format)?);
    Ok(())
}

/// Execute the batch command
pub async fn batch(container: &DefaultAppContainer, args: BatchArgs) -> Result<()> {
    let format = ReportFormat::parse(&args.format)?;
    let extensions = match &args.ext {
        Some(raw) => split_list(raw),
        None => DEFAULT_MEDIA_EXTENSIONS
            .iter()
            .map(|e| e.to_string())
            .collect(),
    };

    let response = container
        .assess_interactor()
        .assess_directory(&args.dir, &extensions)
        .await
        .with_context(|| format!("Failed to assess folder {}", args.dir))?;

    println!("{}", render(&response, format)?);
    Ok(())
}

/// Execute the merge command
pub async fn merge(
    container: &DefaultAppContainer,
    config: &AnalysisConfig,
    args: MergeArgs,
) -> Result<()> {
    let format = ReportFormat::parse(&args.format)?;
    let params = config.merge.params().context("Invalid merge parameters")?;
    let keywords = args.keywords.as_deref().map(split_list).unwrap_or_default();

    let request = MergeRequest::new(&args.detections, params).with_keywords(keywords);
    let response = container
        .merge_interactor()
        .execute(request)
        .await
        .with_context(|| format!("Failed to merge detections from {}", args.detections))?;

    println!("{}", render(&response, format)?);
    Ok(())
}

/// Execute the dedupe command
pub async fn dedupe(
    container: &DefaultAppContainer,
    config: &AnalysisConfig,
    args: DedupeArgs,
) -> Result<()> {
    let format = ReportFormat::parse(&args.format)?;
    let interactor = container.scene_interactor();

    let scenes = interactor
        .load_scenes(&args.scenes)
        .await
        .with_context(|| format!("Failed to load scenes from {}", args.scenes))?;
    let response = interactor
        .dedupe(&args.scenes, &scenes, config.dedupe.similarity_threshold)
        .await;

    println!("{}", render(&response, format)?);
    Ok(())
}

/// Execute the candidates command
pub async fn candidates(
    container: &DefaultAppContainer,
    config: &AnalysisConfig,
    args: CandidatesArgs,
) -> Result<()> {
    let format = ReportFormat::parse(&args.format)?;
    let interactor = container.scene_interactor();

    let scenes = interactor
        .load_scenes(&args.scenes)
        .await
        .with_context(|| format!("Failed to load scenes from {}", args.scenes))?;
    let response = interactor
        .candidates(
            &args.scenes,
            &scenes,
            config.dedupe.similarity_threshold,
            &config.dedupe.candidate_filter(),
        )
        .await;

    println!("{}", render(&response, format)?);
    Ok(())
}
