//! MIPS32 simulator CLI.
//!
//! This binary provides the command-line surface over `mipsim-core`:
//! 1. **Run:** Assemble a source file and execute it under a selected
//!    timing model, then dump registers and an optional memory window.
//! 2. **Check:** Assemble only, reporting every diagnostic.
//! 3. **Disasm:** Assemble and print the encoded words with their
//!    reverse-decoded mnemonics.
//!
//! The console syscall handler lives here; the core only sees the hook.

mod syscalls;

use std::{fs, process};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mipsim_core::asm::DirectiveSet;
use mipsim_core::common::error::AssemblerError;
use mipsim_core::config::{ArchKind, BranchPolicy, Config};
use mipsim_core::exec::RunOutcome;
use mipsim_core::isa::operand::GPR_NAMES;
use mipsim_core::{assemble, InstructionSet, Simulation};

#[derive(Parser, Debug)]
#[command(
    name = "mipsim",
    author,
    version,
    about = "MIPS32 assembler and cycle-stepped simulator",
    long_about = "Assemble MIPS32 source and execute it under one of four timing models \
(single-cycle, multi-cycle, pipelined, multi-ALU pipelined).\n\nExamples:\n  \
mipsim run -f fib.s --arch pipelined\n  mipsim run -f loop.s --branch on-write-back --max-cycles 100000\n  \
mipsim check -f broken.s\n  mipsim disasm -f fib.s"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ArchArg {
    SingleCycle,
    MultiCycle,
    Pipelined,
    MultiAlu,
}

impl From<ArchArg> for ArchKind {
    fn from(arg: ArchArg) -> Self {
        match arg {
            ArchArg::SingleCycle => Self::SingleCycle,
            ArchArg::MultiCycle => Self::MultiCycle,
            ArchArg::Pipelined => Self::Pipelined,
            ArchArg::MultiAlu => Self::MultiAlu,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BranchArg {
    OnDecode,
    OnWriteBack,
}

impl From<BranchArg> for BranchPolicy {
    fn from(arg: BranchArg) -> Self {
        match arg {
            BranchArg::OnDecode => Self::OnDecode,
            BranchArg::OnWriteBack => Self::OnWriteBack,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble and execute a source file.
    Run {
        /// Source file to assemble and run.
        #[arg(short, long)]
        file: String,

        /// Timing model.
        #[arg(long, value_enum)]
        arch: Option<ArchArg>,

        /// Branch resolution policy.
        #[arg(long, value_enum)]
        branch: Option<BranchArg>,

        /// JSON configuration file (flags override it).
        #[arg(long)]
        config: Option<String>,

        /// Cycle budget.
        #[arg(long, default_value_t = 10_000_000)]
        max_cycles: u64,

        /// Dump all registers after the run.
        #[arg(long)]
        regs: bool,

        /// Dump a memory window after the run, as `START:LEN` (hex or
        /// decimal).
        #[arg(long)]
        mem: Option<String>,
    },

    /// Assemble only and report diagnostics.
    Check {
        /// Source file to assemble.
        #[arg(short, long)]
        file: String,
    },

    /// Assemble and print each word with its decoded form.
    Disasm {
        /// Source file to assemble.
        #[arg(short, long)]
        file: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            file,
            arch,
            branch,
            config,
            max_cycles,
            regs,
            mem,
        } => cmd_run(&file, arch, branch, config.as_deref(), max_cycles, regs, mem.as_deref()),
        Commands::Check { file } => cmd_check(&file),
        Commands::Disasm { file } => cmd_disasm(&file),
    }
}

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {path}: {err}");
            process::exit(1);
        }
    }
}

fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = read_source(path);
    match serde_json::from_str(&text) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: bad config {path}: {err}");
            process::exit(1);
        }
    }
}

fn report(errors: &[AssemblerError]) -> ! {
    for error in errors {
        eprintln!("error: {error}");
    }
    eprintln!("{} error(s)", errors.len());
    process::exit(1);
}

fn cmd_run(
    file: &str,
    arch: Option<ArchArg>,
    branch: Option<BranchArg>,
    config_path: Option<&str>,
    max_cycles: u64,
    regs: bool,
    mem: Option<&str>,
) {
    let mut config = load_config(config_path);
    if let Some(arch) = arch {
        config.arch = arch.into();
    }
    if let Some(branch) = branch {
        config.branch = branch.into();
    }

    let source = read_source(file);
    let iset = InstructionSet::mips32();
    let dset = DirectiveSet::mips32();
    let program = match assemble(&source, &iset, &dset, &config.memory) {
        Ok(program) => program,
        Err(errors) => report(&errors),
    };
    println!(
        "Assembled {} words, {} labels, entry {:#010x}",
        program.text.len(),
        program.labels().len(),
        program.entry
    );

    let mut sim = Simulation::with_syscalls(program, &config, Box::new(syscalls::Console::new()));
    match sim.run(max_cycles) {
        Ok(RunOutcome::Exited(code)) => {
            println!("\n[exit {code} after {} cycles]", sim.cycles());
        }
        Ok(RunOutcome::Completed) => {
            println!("\n[completed after {} cycles]", sim.cycles());
        }
        Ok(RunOutcome::OutOfCycles) => {
            eprintln!("\n[cycle budget of {max_cycles} exhausted]");
        }
        Err(fault) => {
            eprintln!("\nruntime error: {fault}");
            process::exit(1);
        }
    }

    if regs {
        dump_registers(&sim);
    }
    if let Some(window) = mem {
        dump_memory(&sim, window);
    }
}

fn cmd_check(file: &str) {
    let source = read_source(file);
    let iset = InstructionSet::mips32();
    let dset = DirectiveSet::mips32();
    let config = Config::default();
    match assemble(&source, &iset, &dset, &config.memory) {
        Ok(program) => {
            println!(
                "ok: {} words, {} labels",
                program.text.len(),
                program.labels().len()
            );
        }
        Err(errors) => report(&errors),
    }
}

fn cmd_disasm(file: &str) {
    let source = read_source(file);
    let iset = InstructionSet::mips32();
    let dset = DirectiveSet::mips32();
    let config = Config::default();
    let program = match assemble(&source, &iset, &dset, &config.memory) {
        Ok(program) => program,
        Err(errors) => report(&errors),
    };
    for instr in &program.text {
        let decoded = iset
            .disassemble(instr.word)
            .map_or_else(|| "<unknown>".to_owned(), |(mn, ops)| {
                if ops.is_empty() {
                    mn.to_owned()
                } else {
                    format!("{mn} {}", ops.join(", "))
                }
            });
        println!("{:#010x}  {:08x}  {decoded}", instr.addr, instr.word);
    }
}

fn dump_registers(sim: &Simulation) {
    let snapshot = sim.registers();
    for i in (0..32).step_by(2) {
        println!(
            "${:<4}={:#010x}  ${:<4}={:#010x}",
            GPR_NAMES[i],
            snapshot.gpr[i],
            GPR_NAMES[i + 1],
            snapshot.gpr[i + 1]
        );
    }
    println!("hi   ={:#010x}  lo   ={:#010x}", snapshot.hi, snapshot.lo);
    println!("pc   ={:#010x}", snapshot.pc);
}

fn dump_memory(sim: &Simulation, window: &str) {
    let Some((start_text, len_text)) = window.split_once(':') else {
        eprintln!("error: --mem expects START:LEN");
        return;
    };
    let parse = |text: &str| {
        mipsim_core::isa::operand::parse_int(text).and_then(|v| u32::try_from(v).ok())
    };
    let (Some(start), Some(len)) = (parse(start_text), parse(len_text)) else {
        eprintln!("error: --mem expects START:LEN");
        return;
    };
    match sim.memory_window(start, len) {
        Ok(bytes) => {
            for (row, chunk) in bytes.chunks(16).enumerate() {
                let addr = start + 16 * row as u32;
                let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
                println!("{addr:#010x}  {}", hex.join(" "));
            }
        }
        Err(err) => eprintln!("error: {err}"),
    }
}
