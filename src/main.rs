use log::{info, warn};
use overclust::graph::Graph;
use overclust::search::{enumerate, lower_bound, EditingOptions};
use overclust::{degeneracy, validate};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::io::BufRead;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut options = EditingOptions::default();
    let mut s = 2usize;
    let mut k_max: Option<i32> = None;
    let mut all_solutions = false;
    let mut split_components = false;
    let mut mode = Mode::Solve;
    let mut unique = UniqueFlags::default();
    let mut random: Option<RandomConfig> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--unique" => {
                mode = Mode::Unique;
                i += 1;
            }
            "-i" => {
                unique.immediate = true;
                i += 1;
            }
            "-h" => {
                unique.header = true;
                i += 1;
            }
            "-q" => {
                unique.quoted = true;
                i += 1;
            }
            "--validate" => {
                mode = Mode::Validate;
                i += 1;
            }
            "--random" => {
                let n = parse_or_usage(args.get(i + 1));
                let count = parse_or_usage(args.get(i + 2));
                let p: f64 = parse_or_usage(args.get(i + 3));
                let seed = match args.get(i + 4).map(|a| a.parse::<u64>()) {
                    Some(Ok(seed)) => {
                        i += 1;
                        seed
                    }
                    _ => 0xC0FFEE,
                };
                random = Some(RandomConfig { n, count, p, seed });
                mode = Mode::Random;
                i += 4;
            }
            "--s" => {
                s = parse_or_usage(args.get(i + 1));
                i += 2;
            }
            "--kmax" => {
                k_max = Some(parse_or_usage(args.get(i + 1)));
                i += 2;
            }
            "--all" => {
                all_solutions = true;
                i += 1;
            }
            "--split" => {
                split_components = true;
                i += 1;
            }
            "--neighborhood" => {
                options.use_fellows_forbidden = false;
                i += 1;
            }
            "--take-first" => {
                options.forbidden_take_first = true;
                i += 1;
            }
            "--no-neighbor-proposition" => {
                options.no_neighbor_proposition = true;
                i += 1;
            }
            "--forbid-cliques" => {
                options.forbid_cliques = true;
                i += 1;
            }
            "--forbid-critical-cliques" => {
                options.forbid_critical_cliques = true;
                i += 1;
            }
            "--forbidden-lists" => {
                options.forbidden_matrix = false;
                i += 1;
            }
            "--forbidden-copy" => {
                options.forbidden_copy = true;
                i += 1;
            }
            "--help" => usage_and_exit(0),
            _ => usage_and_exit(2),
        }
    }

    match mode {
        Mode::Unique => run_unique(&unique),
        Mode::Validate => run_validate(),
        Mode::Random => {
            let config = random.expect("--random parsed above");
            run_random(&config, s, k_max, all_solutions, &mut options);
        }
        Mode::Solve => run_solve(s, k_max, all_solutions, split_components, &mut options),
    }
}

enum Mode {
    Solve,
    Unique,
    Validate,
    Random,
}

#[derive(Default)]
struct UniqueFlags {
    immediate: bool,
    header: bool,
    quoted: bool,
}

struct RandomConfig {
    n: usize,
    count: usize,
    p: f64,
    seed: u64,
}

fn parse_or_usage<T: std::str::FromStr>(arg: Option<&String>) -> T {
    arg.and_then(|a| a.parse().ok())
        .unwrap_or_else(|| usage_and_exit(2))
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  overclust [options]                 solve graph6 instances from stdin\n  overclust --random N COUNT P [SEED] solve random G(N, P) instances\n  overclust --unique [-i] [-h] [-q]   filter stdin to distinct non-empty lines\n  overclust --validate                cross-check bundled scenarios\n\nSolver options:\n  --s S                        cliques-per-vertex bound (default: 2)\n  --kmax K                     largest budget to try (default: n*n)\n  --all                        enumerate all solutions at the found budget\n  --split                      solve each connected component separately\n  --neighborhood               use the s=2 neighbourhood locator\n  --take-first                 branch on the first forbidden subgraph found\n  --no-neighbor-proposition    suppress chord-adds between unrelated leaves\n  --forbid-cliques             pre-forbid edges inside cliques of size >= 3\n  --forbid-critical-cliques    pre-forbid edges inside critical cliques\n  --forbidden-lists            store forbidden pairs as sorted lists\n  --forbidden-copy             copy the forbidden table per child branch\n\nUnique filter flags:\n  -i  stream each new line immediately\n  -h  print a header line with the final count\n  -q  quote each emitted line and terminate it with a comma\n"
    );
    std::process::exit(code)
}

// ============================================================================
// Solve mode
// ============================================================================

fn run_solve(
    s: usize,
    k_max: Option<i32>,
    all_solutions: bool,
    split_components: bool,
    options: &mut EditingOptions,
) {
    let stdin = std::io::stdin();
    let mut graph_count = 0usize;
    for line in stdin.lock().lines() {
        let line = line.expect("reading stdin");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        graph_count += 1;

        let g = match Graph::parse_graph6(line) {
            Ok(g) => g,
            Err(e) => {
                warn!("graph {graph_count}: skipping unparsable line: {e}");
                continue;
            }
        };

        println!("graph {graph_count}: {line}");
        if split_components {
            for (index, component) in g.components().iter().enumerate() {
                println!("  component {}: n={}", index + 1, component.n());
                solve_one(component, s, k_max, all_solutions, options, "    ");
            }
        } else {
            solve_one(&g, s, k_max, all_solutions, options, "  ");
        }
    }
}

fn solve_one(
    g: &Graph,
    s: usize,
    k_max: Option<i32>,
    all_solutions: bool,
    options: &mut EditingOptions,
    indent: &str,
) {
    let deg = degeneracy_ordering_report(g);
    let bound = lower_bound(g, s, -1);
    println!(
        "{indent}n={} m={} degeneracy={deg} lower_bound={bound}",
        g.n(),
        g.m(),
    );

    let k_limit = k_max.unwrap_or_else(|| (g.n() as i32).saturating_mul(g.n() as i32));
    let cap = if all_solutions { None } else { Some(1) };
    for k in 0..=k_limit {
        let solutions = enumerate(g, s, k, options, cap);
        if solutions.is_empty() {
            continue;
        }
        println!("{indent}k={k}: {} solution(s)", solutions.len());
        for (index, solution) in solutions.iter().enumerate() {
            print!("{indent}  solution {}: added=[", index + 1);
            print_records(&solution.edges_added);
            print!("] removed=[");
            print_records(&solution.edges_removed);
            println!("]");
        }
        info!("solved within k={k}: {options}");
        return;
    }
    println!("{indent}no solution up to k={k_limit}");
}

fn degeneracy_ordering_report(g: &Graph) -> usize {
    degeneracy::degeneracy_ordering(g, 0, 0).degeneracy
}

fn print_records(records: &[overclust::graph::EditRecord]) {
    let rendered: Vec<String> = records.iter().map(ToString::to_string).collect();
    print!("{}", rendered.join(","));
}

// ============================================================================
// Random-instance mode
// ============================================================================

fn run_random(
    config: &RandomConfig,
    s: usize,
    k_max: Option<i32>,
    all_solutions: bool,
    options: &mut EditingOptions,
) {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    for index in 1..=config.count {
        let g = Graph::random(config.n, config.p, &mut rng);
        match g.to_graph6() {
            Ok(encoded) => println!("random graph {index}: {encoded}"),
            Err(_) => println!("random graph {index}: n={}", g.n()),
        }
        solve_one(&g, s, k_max, all_solutions, options, "  ");
    }
}

// ============================================================================
// Unique-string filter
// ============================================================================

fn run_unique(flags: &UniqueFlags) {
    let stdin = std::io::stdin();
    let mut seen = HashSet::new();
    let mut in_order = Vec::new();

    for line in stdin.lock().lines() {
        let line = line.expect("reading stdin");
        if line.is_empty() {
            continue;
        }
        if !seen.insert(line.clone()) {
            continue;
        }
        if flags.immediate {
            emit_line(&line, flags.quoted);
        } else {
            in_order.push(line);
        }
    }

    if flags.header {
        println!("{}", seen.len());
    }
    if !flags.immediate {
        for line in &in_order {
            emit_line(line, flags.quoted);
        }
    }
}

fn emit_line(line: &str, quoted: bool) {
    if quoted {
        println!("\"{line}\",");
    } else {
        println!("{line}");
    }
}

// ============================================================================
// Scenario validation
// ============================================================================

/// Cross-checks the solver against the brute-force reference on a handful
/// of bundled instances. Exits non-zero on the first disagreement.
fn run_validate() {
    // (name, graph6, budgets to try)
    let cases: [(&str, &str, i32); 6] = [
        ("triangle", "Bw", 1),
        ("claw", "Cs", 2),
        ("path", "Ch", 2),
        ("complete K4", "C~", 2),
        ("cycle C5", "Dhc", 2),
        ("empty", "D??", 2),
    ];

    let mut failures = 0usize;
    for (name, encoded, max_k) in cases {
        let g = match Graph::parse_graph6(encoded) {
            Ok(g) => g,
            Err(e) => {
                println!("{name}: FAILED to parse {encoded}: {e}");
                failures += 1;
                continue;
            }
        };
        if g.to_graph6().as_deref() != Ok(encoded) {
            println!("{name}: FAILED graph6 round-trip");
            failures += 1;
            continue;
        }

        let mut case_ok = true;
        for k in 0..=max_k {
            let expected = validate::brute_force_solvable(&g, 2, k);
            let mut options = EditingOptions::default();
            let solutions = enumerate(&g, 2, k, &mut options, None);
            if solutions.is_empty() == expected {
                println!(
                    "{name}: FAILED at k={k}: solver={} brute-force={expected}",
                    !solutions.is_empty()
                );
                case_ok = false;
                break;
            }
            for solution in &solutions {
                if let Err(e) = validate::check_solution(&g, solution, 2, k) {
                    println!("{name}: FAILED at k={k}: invalid solution: {e}");
                    case_ok = false;
                    break;
                }
            }
            if !case_ok {
                break;
            }
        }
        if case_ok {
            println!("{name}: OK");
        } else {
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!("{failures} scenario(s) failed");
        std::process::exit(1);
    }
    println!("all scenarios OK");
}
