use clap::Parser;
use env_logger::Env;
use log::info;
use polyeq::{IntegrationMethod, Linear, NumericOptions, Polynomial, Quadratic, TermOrder};
use std::process;

#[derive(Parser)]
#[command(name = "polyeq")]
#[command(about = "Inspect a polynomial: canonical form, calculus, roots and integrals")]
#[command(version)]
struct Args {
    /// Coefficients, constant term first unless --descending is given
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    coefficients: Vec<f64>,

    /// Read the coefficients from the highest power down
    #[arg(long)]
    descending: bool,

    /// Lower bound of the definite integral
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    lower: f64,

    /// Upper bound of the definite integral
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    upper: f64,

    /// Step size of the numeric integral
    #[arg(long, default_value_t = polyeq::numeric::DEFAULT_EPSILON)]
    epsilon: f64,

    /// Numeric integration method: left, middle, right or trapezoid
    #[arg(long, default_value = "trapezoid")]
    method: String,

    /// Number of decimals printed for every coefficient
    #[arg(long)]
    precision: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(report) => println!("{report}"),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let order = if args.descending {
        TermOrder::Descending
    } else {
        TermOrder::Ascending
    };
    let polynomial = Polynomial::new(args.coefficients.clone(), order);
    let method: IntegrationMethod = args.method.parse()?;
    let options = NumericOptions::new(args.epsilon, method);
    info!("inspecting {polynomial} with {method} steps of {}", args.epsilon);

    let show = |p: &Polynomial| match args.precision {
        Some(precision) => p.to_string_with(precision),
        None => p.to_string(),
    };

    let mut lines = vec![
        format!("f(x)  = {}", show(&polynomial)),
        format!("f'(x) = {}", show(&polynomial.derive())),
        format!("F(x)  = {}", show(&polynomial.integrate())),
    ];

    match polynomial.order() {
        0 => {}
        1 => {
            let line = Linear::try_from(&polynomial)?;
            lines.push(format!("root  = {}", line.root()));
        }
        2 => {
            let quadratic = Quadratic::try_from(&polynomial)?;
            let roots = quadratic.real_roots();
            if roots.is_empty() {
                lines.push("roots = none (discriminant < 0)".to_string());
            } else {
                let roots: Vec<String> = roots.iter().map(f64::to_string).collect();
                lines.push(format!("roots = {}", roots.join(", ")));
            }
        }
        n => lines.push(format!("roots = not computed for order {n}")),
    }

    let exact = polynomial.integrate_between(args.lower, args.upper);
    let numeric = polynomial.integrate_numeric(args.lower, args.upper, &options)?;
    lines.push(format!(
        "integral [{}, {}] = {exact} (closed form), {numeric} ({method}, eps {})",
        args.lower, args.upper, args.epsilon
    ));

    Ok(lines.join("\n"))
}
