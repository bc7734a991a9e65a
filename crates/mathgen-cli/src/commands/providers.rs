use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mathgen::Provider;
use mathgen::provider::WireProtocol;

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct ProvidersCommand;

fn protocol_name(protocol: WireProtocol) -> &'static str {
    match protocol {
        WireProtocol::OpenAiCompatible => "openai-compatible",
        WireProtocol::AnthropicMessages => "anthropic-messages",
    }
}

impl ProvidersCommand {
    pub async fn execute(&self, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Json => {
                let providers: Vec<_> = Provider::ALL
                    .iter()
                    .map(|provider| {
                        let profile = provider.profile();
                        serde_json::json!({
                            "name": provider.as_str(),
                            "protocol": protocol_name(profile.protocol),
                            "default_model": profile.default_model,
                            "default_base_url": profile.default_base_url,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&providers)?);
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Provider", "Protocol", "Default Model", "Default Base URL"]);

                for provider in Provider::ALL {
                    let profile = provider.profile();
                    table.add_row([
                        provider.as_str(),
                        protocol_name(profile.protocol),
                        profile.default_model,
                        profile.default_base_url,
                    ]);
                }

                println!("{table}");
            }
        }

        Ok(())
    }
}
