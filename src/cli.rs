use chrono::Datelike;
use log::warn;
use std::path::PathBuf;

use crate::alkansya_client::*;
use crate::constants::*;
use crate::currency_converter_client::*;
use crate::currency_formatter::*;
use crate::entry_forms::*;
use crate::errors::*;
use crate::export_processor::*;
use crate::models::*;
use crate::sheets_client::*;
use crate::submission::*;
use crate::types::*;
use crate::utilities::*;

pub fn run() -> Result<()> {
    initialize()?;
    run_clap_matches(get_clap_matches())
}

fn initialize() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let proj_dirs = directories::ProjectDirs::from("app", "MyAlkansya", clap::crate_name!())
        .chain_err(|| "Failed to determine user data directory")?;
    let mut default_export_dir = proj_dirs.data_dir().to_path_buf();
    default_export_dir.push(EXPORT_DIRECTORY_NAME);

    default_env(API_URL_ENV, DEFAULT_API_URL);
    default_env(OUTPUT_DIR_ENV, default_export_dir);

    Ok(())
}

fn amount_arg(name: &'static str, help: &'static str) -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(name)
        .long(name)
        .value_name("AMOUNT")
        .help(help)
        .takes_value(true)
        .validator(|value| parse_amount(&value).map(|_| ()).map_err(|err| err.to_string()))
}

fn date_arg(name: &'static str, help: &'static str) -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(name)
        .long(name)
        .value_name("YYYY-MM-DD")
        .help(help)
        .takes_value(true)
        .validator(|value| {
            parse_iso_date(&value)
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
}

fn currency_arg(name: &'static str, help: &'static str) -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(name)
        .value_name("CODE")
        .help(help)
        .takes_value(true)
        .validator(|value| {
            CurrencyCode::from_str(&value)
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
}

fn text_arg(name: &'static str, help: &'static str) -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(name)
        .long(name)
        .value_name("TEXT")
        .help(help)
        .takes_value(true)
        .required(true)
}

fn number_arg(name: &'static str, help: &'static str) -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(name)
        .long(name)
        .value_name("NUMBER")
        .help(help)
        .takes_value(true)
        .validator(|value| {
            value
                .parse::<i64>()
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
}

fn entry_subcommand(name: &'static str, about: &'static str) -> clap::App<'static, 'static> {
    clap::SubCommand::with_name(name)
        .about(about)
        .arg(
            currency_arg(CURRENCY_ARG, "Currency the amounts are entered in (defaults to your account currency)")
                .long(CURRENCY_ARG),
        )
        .arg(number_arg(ID_ARG, "Update the existing record with this ID instead of creating one"))
}

fn get_clap_matches() -> clap::ArgMatches<'static> {
    clap::App::new(clap::crate_name!())
        .version(option_env!("CI_BUILD_VERSION").unwrap_or(clap::crate_version!()))
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .arg(
            clap::Arg::with_name(API_URL_ARG)
                .env(API_URL_ENV)
                .long(API_URL_ARG)
                .value_name("URL")
                .help("Base URL of the MyAlkansya server")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name(AUTH_TOKEN_ARG)
                .env(AUTH_TOKEN_ENV)
                .long(AUTH_TOKEN_ARG)
                .value_name("TOKEN")
                .help("MyAlkansya bearer token for your account")
                .takes_value(true)
                .required(true),
        )
        .arg(
            clap::Arg::with_name(GOOGLE_ACCESS_TOKEN_ARG)
                .env(GOOGLE_ACCESS_TOKEN_ENV)
                .long(GOOGLE_ACCESS_TOKEN_ARG)
                .value_name("TOKEN")
                .help("Google OAuth access token with the spreadsheets scope (enables Sheets export)")
                .takes_value(true),
        )
        .subcommand(
            clap::SubCommand::with_name(CONVERT_COMMAND)
                .about("Convert an amount between two currencies")
                .arg(
                    clap::Arg::with_name(AMOUNT_ARG)
                        .value_name("AMOUNT")
                        .help("Amount to convert")
                        .index(1)
                        .required(true)
                        .validator(|value| {
                            parse_amount(&value).map(|_| ()).map_err(|err| err.to_string())
                        }),
                )
                .arg(currency_arg(FROM_ARG, "Currency to convert from").index(2).required(true))
                .arg(currency_arg(TO_ARG, "Currency to convert to").index(3).required(true)),
        )
        .subcommand(
            clap::SubCommand::with_name(RATES_COMMAND)
                .about("List exchange rates for a base currency")
                .arg(currency_arg(BASE_ARG, "Base currency").index(1).required(true)),
        )
        .subcommand(
            entry_subcommand(ADD_INCOME_COMMAND, "Save an income record")
                .arg(text_arg(SOURCE_ARG, "Where the income came from"))
                .arg(amount_arg(AMOUNT_ARG, "Income amount").required(true))
                .arg(date_arg(DATE_ARG, "Date received (defaults to today)")),
        )
        .subcommand(
            entry_subcommand(ADD_EXPENSE_COMMAND, "Save an expense record")
                .arg(text_arg(SUBJECT_ARG, "What the expense was for"))
                .arg(text_arg(CATEGORY_ARG, "Expense category"))
                .arg(amount_arg(AMOUNT_ARG, "Expense amount").required(true))
                .arg(date_arg(DATE_ARG, "Date spent (defaults to today)")),
        )
        .subcommand(
            entry_subcommand(ADD_BUDGET_COMMAND, "Save a monthly budget")
                .arg(text_arg(CATEGORY_ARG, "Budget category"))
                .arg(amount_arg(AMOUNT_ARG, "Monthly budget amount").required(true))
                .arg(number_arg(MONTH_ARG, "Budget month, 1-12 (defaults to this month)"))
                .arg(number_arg(YEAR_ARG, "Budget year (defaults to this year)")),
        )
        .subcommand(
            entry_subcommand(ADD_SAVINGS_GOAL_COMMAND, "Save a savings goal")
                .arg(text_arg(GOAL_ARG, "Name of the goal"))
                .arg(amount_arg(TARGET_AMOUNT_ARG, "Amount to save").required(true))
                .arg(amount_arg(CURRENT_AMOUNT_ARG, "Amount saved so far (defaults to 0)"))
                .arg(date_arg(TARGET_DATE_ARG, "Date the goal should be reached").required(true)),
        )
        .subcommand(
            clap::SubCommand::with_name(EXPORT_COMMAND)
                .about("Export your financial data to CSV or Google Sheets")
                .arg(
                    clap::Arg::with_name(FORMAT_ARG)
                        .long(FORMAT_ARG)
                        .value_name("FORMAT")
                        .help("Export target; Sheets falls back to CSV when unavailable")
                        .takes_value(true)
                        .possible_values(&EXPORT_FORMATS)
                        .default_value(EXPORT_FORMAT_CSV),
                )
                .arg(
                    clap::Arg::with_name(OUTPUT_DIR_ARG)
                        .env(OUTPUT_DIR_ENV)
                        .long(OUTPUT_DIR_ARG)
                        .value_name("PATH")
                        .help("Directory CSV exports are written to")
                        .takes_value(true),
                )
                .arg(number_arg(MONTH_ARG, "Summary month, 1-12 (defaults to this month)"))
                .arg(number_arg(YEAR_ARG, "Summary year (defaults to this year)")),
        )
        .get_matches()
}

fn run_clap_matches(matches: clap::ArgMatches) -> Result<()> {
    let client = AlkansyaClient::new(
        required_value(&matches, API_URL_ARG)?,
        required_value(&matches, AUTH_TOKEN_ARG)?.to_string(),
    )?;
    match matches.subcommand() {
        (CONVERT_COMMAND, Some(sub_matches)) => run_convert(&client, sub_matches),
        (RATES_COMMAND, Some(sub_matches)) => run_rates(&client, sub_matches),
        (EXPORT_COMMAND, Some(sub_matches)) => run_export(
            &client,
            matches.value_of(GOOGLE_ACCESS_TOKEN_ARG),
            sub_matches,
        ),
        (command, Some(sub_matches)) => run_entry(&client, command, sub_matches),
        _ => bail!("No command given; see --help"),
    }
}

fn run_convert(client: &AlkansyaClient, matches: &clap::ArgMatches) -> Result<()> {
    let from = currency_value(matches, FROM_ARG)?;
    let to = currency_value(matches, TO_ARG)?;
    let amount = parse_amount(required_value(matches, AMOUNT_ARG)?)?;
    let converted = CurrencyConverterClient::new(client).convert(amount, from, to)?;
    let formatter = CurrencyFormatter::new(from);
    println!(
        "{} = {}",
        formatter.format_with_code(from, amount),
        formatter.format_with_code(to, converted)
    );
    Ok(())
}

fn run_rates(client: &AlkansyaClient, matches: &clap::ArgMatches) -> Result<()> {
    let base = currency_value(matches, BASE_ARG)?;
    println!("Exchange rates for 1 {}:", base);
    for (code, rate) in client.get_all_rates(base)? {
        println!("  {} {}", code, rate);
    }
    Ok(())
}

fn run_entry(client: &AlkansyaClient, command: &str, matches: &clap::ArgMatches) -> Result<()> {
    let default_currency = load_default_currency(client);
    let currency = matches
        .value_of(CURRENCY_ARG)
        .map(CurrencyCode::from_str)
        .transpose()?
        .unwrap_or(default_currency);
    let target = match matches.value_of(ID_ARG) {
        Some(id) => SubmissionTarget::Update(
            id.parse()
                .chain_err(|| format!("Invalid --{}: {}", ID_ARG, id))?,
        ),
        None => SubmissionTarget::Create,
    };
    let pipeline = SubmissionPipeline::new(client, client, default_currency);
    let converter = CurrencyConverterClient::new(client);
    let today = chrono::Local::now().date_naive();
    let date = |name: &str| {
        matches
            .value_of(name)
            .map(|value| value.to_string())
            .unwrap_or_else(|| format_iso_date(today))
    };

    let submitted = match command {
        ADD_INCOME_COMMAND => {
            let mut form = IncomeForm::new(default_currency);
            form.change_currency(currency, &converter);
            form.source = required_value(matches, SOURCE_ARG)?.to_string();
            form.date = date(DATE_ARG);
            form.set_amount(required_value(matches, AMOUNT_ARG)?);
            pipeline.submit(&form, target)?
        }
        ADD_EXPENSE_COMMAND => {
            let mut form = ExpenseForm::new(default_currency);
            form.change_currency(currency, &converter);
            form.subject = required_value(matches, SUBJECT_ARG)?.to_string();
            form.category = required_value(matches, CATEGORY_ARG)?.to_string();
            form.date = date(DATE_ARG);
            form.set_amount(required_value(matches, AMOUNT_ARG)?);
            pipeline.submit(&form, target)?
        }
        ADD_BUDGET_COMMAND => {
            let period = summary_period(matches)?;
            let mut form = BudgetForm::new(default_currency, period.month, period.year);
            form.change_currency(currency, &converter);
            form.category = required_value(matches, CATEGORY_ARG)?.to_string();
            form.set_monthly_budget(required_value(matches, AMOUNT_ARG)?);
            pipeline.submit(&form, target)?
        }
        ADD_SAVINGS_GOAL_COMMAND => {
            let mut form = SavingsGoalForm::new(default_currency);
            form.change_currency(currency, &converter);
            form.goal = required_value(matches, GOAL_ARG)?.to_string();
            form.target_date = required_value(matches, TARGET_DATE_ARG)?.to_string();
            form.set_target_amount(required_value(matches, TARGET_AMOUNT_ARG)?);
            if let Some(current) = matches.value_of(CURRENT_AMOUNT_ARG) {
                form.set_current_amount(current);
            }
            pipeline.submit(&form, target)?
        }
        _ => bail!("Unknown command: {}", command),
    };

    if let Some((amount, original_currency)) = submitted.converted_from {
        println!(
            "Converted {} {} to {} for storage.",
            format_amount(amount),
            original_currency,
            default_currency
        );
    }
    println!("Saved.");
    Ok(())
}

fn run_export(
    client: &AlkansyaClient,
    google_access_token: Option<&str>,
    matches: &clap::ArgMatches,
) -> Result<()> {
    let default_currency = load_default_currency(client);
    let period = summary_period(matches)?;
    let output_dir = PathBuf::from(required_value(matches, OUTPUT_DIR_ARG)?);
    let publisher = match (matches.value_of(FORMAT_ARG), google_access_token) {
        (Some(EXPORT_FORMAT_SHEETS), Some(token)) => {
            Some(GoogleSheetsClient::new(token.to_string())?)
        }
        (Some(EXPORT_FORMAT_SHEETS), None) => {
            println!(
                "No Google access token set (--{}); exporting CSV instead.",
                GOOGLE_ACCESS_TOKEN_ARG
            );
            None
        }
        _ => None,
    };
    let outcome = ExportProcessor::new(client, default_currency, &output_dir).run(
        period,
        publisher.as_ref(),
        chrono::Local::now().naive_local(),
    )?;
    match outcome {
        ExportOutcome::Sheets(url) => println!("Exported to Google Sheets: {}", url),
        ExportOutcome::Csv(path) => println!("Exported to {}", path.display()),
    }
    Ok(())
}

fn load_default_currency<B: AlkansyaBackend>(backend: &B) -> CurrencyCode {
    backend.get_default_currency().unwrap_or_else(|err| {
        warn!("Could not load default currency, using {}: {}", DEFAULT_CURRENCY, err);
        CurrencyCode::default_currency()
    })
}

fn summary_period(matches: &clap::ArgMatches) -> Result<SummaryPeriod> {
    let today = chrono::Local::now().date_naive();
    let month = match matches.value_of(MONTH_ARG) {
        Some(month) => month
            .parse()
            .chain_err(|| format!("Invalid --{}: {}", MONTH_ARG, month))?,
        None => today.month(),
    };
    let year = match matches.value_of(YEAR_ARG) {
        Some(year) => year
            .parse()
            .chain_err(|| format!("Invalid --{}: {}", YEAR_ARG, year))?,
        None => today.year(),
    };
    Ok(SummaryPeriod { month, year })
}

fn currency_value(matches: &clap::ArgMatches, name: &str) -> Result<CurrencyCode> {
    CurrencyCode::from_str(required_value(matches, name)?)
}

fn required_value<'m>(matches: &'m clap::ArgMatches, name: &str) -> Result<&'m str> {
    matches
        .value_of(name)
        .chain_err(|| format!("Missing required argument: {}", name))
}
