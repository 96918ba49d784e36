//! Bond Valuation CLI
//!
//! Command-line interface for pricing, yield solving and curve bootstrapping.
//! Solver settings can be overridden through BOND_SOLVER_* environment variables.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bond_valuation::bond::BondSpec;
use bond_valuation::report::{write_curve_csv, write_schedule_csv};
use bond_valuation::request::{ValuationRequest, ValuationResponse};
use bond_valuation::{CurveInputs, ValuationConfig};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bond_valuation", version, about = "Fixed-coupon bond pricing and spot curve bootstrapping")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Present value at a flat yield
    Price {
        #[command(flatten)]
        bond: BondArgs,

        /// Annual flat yield in percent
        #[arg(long = "yield", allow_hyphen_values = true)]
        flat_yield: f64,
    },
    /// Yield-to-maturity implied by a price
    Yield {
        #[command(flatten)]
        bond: BondArgs,

        /// Observed price
        #[arg(long, allow_hyphen_values = true)]
        price: f64,

        /// Solver seed in percent
        #[arg(long, allow_hyphen_values = true)]
        guess: Option<f64>,
    },
    /// Bootstrap spot rates from coupon instruments
    Bootstrap {
        /// Observed price shared by all instruments
        #[arg(long)]
        price: f64,

        /// Tenors in years, comma separated and ascending
        #[arg(long, value_delimiter = ',', required = true)]
        tenors: Vec<f64>,

        /// Coupon rates in percent, aligned with tenors
        #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        coupons: Vec<f64>,

        #[arg(long, default_value_t = 100.0)]
        face: f64,

        #[arg(long, default_value_t = 2)]
        frequency: u32,

        /// Also write the curve to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List the cash flows of a bond
    Schedule {
        #[command(flatten)]
        bond: BondArgs,

        /// Also write the schedule to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Run the reference examples
    Demo,
}

#[derive(Args)]
struct BondArgs {
    #[arg(long, default_value_t = 100.0)]
    face: f64,

    /// Years to maturity
    #[arg(long)]
    maturity: f64,

    /// Annual coupon rate in percent
    #[arg(long, allow_hyphen_values = true)]
    coupon: f64,

    /// Coupon payments per year
    #[arg(long, default_value_t = 2)]
    frequency: u32,
}

impl BondArgs {
    fn to_bond(&self) -> Result<BondSpec> {
        Ok(BondSpec::new(self.face, self.maturity, self.coupon, self.frequency)?)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = ValuationConfig::from_env();

    let requests = match cli.command {
        Command::Price { bond, flat_yield } => vec![ValuationRequest::Price {
            bond: bond.to_bond()?,
            flat_yield_percent: flat_yield,
        }],
        Command::Yield { bond, price, guess } => {
            if let Some(guess) = guess {
                config.yield_convergence.initial_guess = guess;
            }
            vec![ValuationRequest::ImpliedYield {
                bond: bond.to_bond()?,
                observed_price: price,
                convergence: None,
            }]
        }
        Command::Bootstrap { price, tenors, coupons, face, frequency, csv } => {
            let request = ValuationRequest::Bootstrap {
                inputs: CurveInputs {
                    observed_price: price,
                    tenors,
                    coupon_rates_percent: coupons,
                    face_value: face,
                    payments_per_year: frequency,
                },
                convergence: None,
            };
            let response = request.evaluate(&config)?;
            if let (Some(path), Some(curve)) = (csv, response.spot_curve.as_ref()) {
                let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                write_curve_csv(curve, frequency, file)?;
                eprintln!("Curve written to: {}", path.display());
            }
            return print_response(&response, cli.json);
        }
        Command::Schedule { bond, csv } => {
            let bond = bond.to_bond()?;
            if let Some(path) = csv {
                let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                write_schedule_csv(&bond.cash_flows(), file)?;
                eprintln!("Schedule written to: {}", path.display());
            }
            vec![ValuationRequest::Schedule { bond }]
        }
        Command::Demo => demo_requests()?,
    };

    for request in &requests {
        let response = request.evaluate(&config)?;
        print_response(&response, cli.json)?;
    }

    Ok(())
}

/// Reference examples: a 5-year monthly 5% bond at 5.1%, and a semiannual 4-point curve
fn demo_requests() -> Result<Vec<ValuationRequest>> {
    let bond = BondSpec::new(100.0, 5.0, 5.0, 12)?;
    let price = bond_valuation::PresentValueEngine::price(&bond, 5.1)?;

    Ok(vec![
        ValuationRequest::Price { bond, flat_yield_percent: 5.1 },
        ValuationRequest::ImpliedYield { bond, observed_price: price, convergence: None },
        ValuationRequest::Bootstrap {
            inputs: CurveInputs {
                observed_price: 100.0,
                tenors: vec![0.5, 1.0, 1.5, 2.0],
                coupon_rates_percent: vec![5.0, 5.5, 6.0, 6.5],
                face_value: 100.0,
                payments_per_year: 2,
            },
            convergence: None,
        },
    ])
}

fn print_response(response: &ValuationResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    if let Some(price) = response.price {
        println!("Price: {:.6}", price);
    }
    if let Some(ytm) = response.implied_yield_percent {
        println!("Yield to maturity: {:.6}%", ytm);
    }
    if let Some(curve) = &response.spot_curve {
        println!("{:>5} {:>10} {:>12}", "Index", "Tenor", "Spot");
        println!("{}", "-".repeat(29));
        for (index, point) in curve.points().iter().enumerate() {
            println!("{:>5} {:>10.4} {:>11.6}%", index, point.tenor_years, point.spot_rate * 100.0);
        }
    }
    if let Some(schedule) = &response.cash_flows {
        println!("{:>10} {:>14} {:>11}", "Time", "Amount", "Kind");
        println!("{}", "-".repeat(37));
        for cf in schedule {
            println!("{:>10.4} {:>14.6}  {:?}", cf.time_years, cf.amount, cf.kind);
        }
    }

    Ok(())
}
