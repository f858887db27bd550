// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Liaison CLI - supplier onboarding and guest audits for a Microsoft 365
//! tenant.
//!
//! Credentials come from `LIAISON_TENANT_ID`, `LIAISON_CLIENT_ID` and
//! `LIAISON_CLIENT_SECRET` (or `LIAISON_CLIENT_SECRET_FILE`). Logs go to
//! stderr so `--json` output on stdout stays machine-readable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use liaison_graph::{GraphClient, GraphConfig};
use liaison_guest_audit::{
	aggregate_domains, fetch_guest_identities, write_report_to_path, DEFAULT_REPORT_FILE,
};
use liaison_provisioning::{
	GuestStatus, OnboardingSettings, ProvisioningRequest, ProvisioningRun, SupplierOnboarding,
	TeamProvisioningState, DEFAULT_EXPIRY_HORIZON_DAYS,
};

/// Liaison - supplier collaboration tooling for Microsoft 365
#[derive(Parser, Debug)]
#[command(name = "liaison", version, about, long_about = None)]
struct Args {
	/// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
	#[arg(short, long, env = "LIAISON_LOG_LEVEL", default_value = "info")]
	log_level: String,

	/// Output logs as JSON
	#[arg(long)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Create a supplier group and team, then invite the supplier's users as guests
	Onboard {
		/// Supplier organization name
		#[arg(long)]
		name: String,

		/// Supplier email domain, recorded in the group description
		#[arg(long)]
		domain: String,

		/// Supplier user to invite (repeatable, processed in order)
		#[arg(long = "invite", value_name = "EMAIL")]
		invitees: Vec<String>,

		/// Days until the supplier group is marked as expired
		#[arg(long, default_value_t = DEFAULT_EXPIRY_HORIZON_DAYS)]
		expiry_days: u32,

		/// Invitation redirect used when the group has no site yet
		#[arg(long, value_name = "URL")]
		redirect_url: Option<Url>,

		/// Do not request a team on the new group
		#[arg(long)]
		skip_team: bool,

		/// Print the run result as JSON
		#[arg(long)]
		json: bool,
	},

	/// Report guest users grouped by their home email domain
	AuditGuests {
		/// CSV file to write
		#[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
		output: PathBuf,
	},
}

fn init_tracing(level: &str, json: bool) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("liaison={level}")));

	if json {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().compact().with_writer(std::io::stderr))
			.init();
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	init_tracing(&args.log_level, args.json_logs);

	let config = GraphConfig::from_env().context("failed to load Graph configuration")?;
	let client = GraphClient::new(config).context("failed to create Graph client")?;

	match args.command {
		Command::Onboard {
			name,
			domain,
			invitees,
			expiry_days,
			redirect_url,
			skip_team,
			json,
		} => {
			let request =
				ProvisioningRequest::new(name, domain, invitees).with_expiry_horizon_days(expiry_days);
			let mut settings = OnboardingSettings {
				provision_team: !skip_team,
				..OnboardingSettings::default()
			};
			if let Some(url) = redirect_url {
				settings.redirect_fallback = url.to_string();
			}

			run_onboard(client, settings, &request, json).await
		}
		Command::AuditGuests { output } => run_audit(&client, &output).await,
	}
}

async fn run_onboard(
	client: GraphClient,
	settings: OnboardingSettings,
	request: &ProvisioningRequest,
	json: bool,
) -> Result<()> {
	info!(
		organization = %request.organization_name,
		invitees = request.invitee_emails.len(),
		"starting supplier onboarding"
	);

	let onboarding = SupplierOnboarding::with_settings(client, settings);
	let run = match onboarding.run(request).await {
		Ok(run) => run,
		Err(e) => {
			if let Some(space_id) = e.orphaned_space_id() {
				warn!(space_id, "supplier group exists without a team; remove it before re-running");
			}
			return Err(e).context("supplier onboarding failed");
		}
	};

	if json {
		println!(
			"{}",
			serde_json::to_string_pretty(&run).context("failed to serialize run result")?
		);
	} else {
		print_run(&run);
	}

	let failed = run.failed_guests().count();
	if failed > 0 {
		anyhow::bail!(
			"{failed} of {} invitees could not be onboarded",
			run.guests.len()
		);
	}
	Ok(())
}

fn print_run(run: &ProvisioningRun) {
	println!("Created group: {} ({})", run.space.display_name, run.space.id);

	let team = match run.team_state {
		TeamProvisioningState::Requested => "requested (provisioning continues in the background)",
		TeamProvisioningState::Unknown => "request sent, state unknown",
		TeamProvisioningState::NotRequested => "not requested",
	};
	println!("Team: {team}");
	println!("Site URL: {}", run.site.url.as_deref().unwrap_or("(not available yet)"));

	for guest in &run.guests {
		match guest.status {
			GuestStatus::InvitedAndAdded => println!("  {}: invited and added to group", guest.email),
			GuestStatus::InvitedNoIdentity => {
				println!("  {}: invited, no guest id returned, not added to group", guest.email)
			}
			GuestStatus::Failed => println!(
				"  {}: failed: {}",
				guest.email,
				guest.error.as_deref().unwrap_or("unknown error")
			),
		}
	}
}

async fn run_audit(client: &GraphClient, output: &Path) -> Result<()> {
	let guests = fetch_guest_identities(client)
		.await
		.context("failed to list guest users")?;

	let rows = aggregate_domains(&guests);
	write_report_to_path(&rows, output)
		.with_context(|| format!("failed to write report to {}", output.display()))?;

	println!(
		"Wrote {} external domains ({} guests) to {}",
		rows.len(),
		guests.len(),
		output.display()
	);
	Ok(())
}
