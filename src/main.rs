use anyhow::Context;
use clap::Parser;
use rebs_client::config::cli::{Command, ReleaseCommand};
use rebs_client::domain::model::{CashBookFilter, ContractRelease, StaffFilter, UserInfo};
use rebs_client::nav::{self, CurrentRoute};
use rebs_client::stores::ContFilter;
use rebs_client::utils::logger;
use rebs_client::workflow::{BookingForm, StepRecord};
use rebs_client::{AppContext, CliConfig};
use serde::de::DeserializeOwned;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_steps(steps: &[StepRecord]) {
    for step in steps {
        println!("  {:<28} {:?} ({} ms)", step.name, step.status, step.duration.as_millis());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.load_client_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Pass --base-url or create {}", cli.config.display());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(&config.logging.level);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting rebs client against {}", config.api.base_url);
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    if let Command::Menu { user, path } = &cli.command {
        let user: Option<UserInfo> = user.as_deref().map(read_json::<UserInfo>).transpose()?;
        let (is_super, is_staff, is_cash) = user
            .as_ref()
            .map(|u| (u.is_superuser, u.is_staff(), u.has_company_cash()))
            .unwrap_or_default();
        let mut menu = nav::filter_menu(nav::default_menu(), is_super, is_staff, is_cash);
        if let Some(path) = path {
            let current = CurrentRoute {
                path,
                hash: "",
                title: None,
            };
            nav::mark_active(&mut menu, &current);
        }
        return print_json(&menu);
    }

    let mut ctx = AppContext::new(config).context("failed to build client context")?;
    let page_size = ctx.page_size();

    match cli.command {
        Command::Contracts(args) => {
            let filter = ContFilter {
                order_group: args.order_group,
                status: args.status,
                search: args.search,
                page: args.page,
                ..ContFilter::for_project(args.project)
            };
            ctx.contracts.fetch_contract_list(&filter).await?;
            println!(
                "📂 {} contracts ({} pages)",
                ctx.contracts.contracts_count,
                ctx.contracts.contract_pages(page_size)
            );
            print_json(&ctx.contracts.contract_list)?;
        }
        Command::Book { form } => {
            let form: BookingForm = read_json(&form)?;
            let outcome = ctx.booking().create_contract_set(&form).await?;
            println!("✅ contract {:?} registered", outcome.contract.pk);
            print_steps(&outcome.steps);
        }
        Command::UpdateBooking { form } => {
            let form: BookingForm = read_json(&form)?;
            let outcome = ctx.booking().update_contract_set(&form).await?;
            println!("✅ contract {:?} updated", outcome.contract.pk);
            print_steps(&outcome.steps);
        }
        Command::Release(ReleaseCommand::Create { record }) => {
            let record: ContractRelease = read_json(&record)?;
            let outcome = ctx.release().create_release(&record).await?;
            println!("✅ release record {:?} saved", outcome.release.pk);
            if let Some(report) = outcome.report {
                print_steps(&report.steps);
            }
        }
        Command::Release(ReleaseCommand::Update { pk, record, page }) => {
            let record: ContractRelease = read_json(&record)?;
            let outcome = ctx.release().update_release(pk, &record, page).await?;
            println!("✅ release record {} updated", pk);
            if let Some(report) = outcome.report {
                print_steps(&report.steps);
            }
        }
        Command::Release(ReleaseCommand::Run {
            contractor,
            completion_date,
        }) => {
            let report = ctx
                .release()
                .release_set(contractor, completion_date.as_deref())
                .await?;
            if report.already_released {
                println!("ℹ️ contractor {} was already released", contractor);
            }
            print_steps(&report.steps);
            if !report.is_complete() {
                std::process::exit(2);
            }
        }
        Command::Staff(args) => {
            let filter = StaffFilter {
                page: args.page,
                com: args.company,
                dep: args.department,
                q: args.search,
                ..StaffFilter::default()
            };
            ctx.company.fetch_staff_list(&filter).await?;
            println!(
                "👥 {} staff ({} pages)",
                ctx.company.staffs_count,
                ctx.company.staff_pages(page_size)
            );
            print_json(&ctx.company.staff_list)?;
        }
        Command::Cashbook(args) => {
            let filter = CashBookFilter {
                page: args.page,
                from_date: args.from_date,
                to_date: args.to_date,
                contract: args.contract,
                search: args.search,
                ..CashBookFilter::default()
            };
            ctx.pro_cash.fetch_cash_book_list(args.project, &filter).await?;
            println!(
                "💰 {} entries ({} pages)",
                ctx.pro_cash.cash_book_count,
                ctx.pro_cash.cash_book_pages(page_size)
            );
            print_json(&ctx.pro_cash.cash_book_list)?;
        }
        Command::Schedule { month } => {
            ctx.schedule.fetch_schedule_list(month.as_deref()).await?;
            print_json(&ctx.schedule.events())?;
        }
        Command::Menu { .. } => {}
    }

    Ok(())
}
