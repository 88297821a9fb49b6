// bases/grab_cli/src/app.rs
use crate::args::Args;
use crate::output::OutputHandler;
use color_eyre::Result;
use media_fetch::{validate_request, BatchRunner, FetchRequest, MediaFetcher, ValidatedInput};

pub struct App {
    args: Args,
    output: OutputHandler,
}

impl App {
    pub fn new(args: Args) -> Self {
        let output = OutputHandler::new(args.verbose, args.json);
        Self { args, output }
    }

    /// Run the downloads and return the process exit code
    pub async fn run(&self) -> Result<i32> {
        let input = validate_request(
            self.args.urls.as_slice(),
            self.args.audio,
            self.args.video,
            self.args.output.as_deref(),
        );
        let ValidatedInput {
            urls,
            mode,
            output_name,
        } = match input {
            Ok(input) => input,
            Err(error) => {
                self.output.print_invalid_input(&error);
                return Ok(error.exit_code());
            }
        };

        let settings = self.args.settings();
        let runner = BatchRunner::new(settings.jobs);
        let fetcher = MediaFetcher::new(settings).await?;

        let requests: Vec<FetchRequest> = urls
            .into_iter()
            .map(|url| {
                fetcher
                    .request(url, mode)
                    .with_output_name(output_name.clone())
            })
            .collect();

        self.output
            .print_batch_start(requests.len(), mode, runner.jobs(), fetcher.settings().output_dir(mode));

        let report = runner
            .run(&fetcher, requests, &self.output.progress_hook())
            .await;

        self.output.print_report(&report)?;
        Ok(report.exit_code())
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}
