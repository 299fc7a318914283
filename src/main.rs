use dmgboy::memory::Memory;
use dmgboy::motherboard::MotherBoard;
use std::io::Write;

fn main() {
    rog::reg("dmgboy");
    rog::reg("dmgboy::cartridge");

    let mut c_trace = false;
    let mut rom = String::from("");
    {
        let mut ap = argparse::ArgumentParser::new();
        ap.set_description("Gameboy emulator");
        ap.refer(&mut c_trace).add_option(
            &["-l", "--log-instructions"],
            argparse::StoreTrue,
            "Write an instruction-level trace to cpu_log.txt",
        );
        ap.refer(&mut rom).add_argument("rom", argparse::Store, "Rom name");
        ap.parse_args_or_exit();
    }

    let mut mbrd = match MotherBoard::power_up(&rom) {
        Ok(mbrd) => mbrd,
        Err(e) => {
            rog::println!("{}", e);
            std::process::exit(1);
        }
    };

    let rs = if c_trace { run_traced(&mut mbrd) } else { mbrd.emulate() };
    if let Err(e) = rs {
        rog::println!("{}", e);
        std::process::exit(1);
    }
}

// Same loop as MotherBoard::emulate, with one trace line per executed
// instruction: the PC and opcode about to run, then the register pairs and
// IME after it ran.
fn run_traced(mbrd: &mut MotherBoard) -> Result<(), dmgboy::DmgError> {
    let file = match std::fs::File::create("cpu_log.txt") {
        Ok(file) => file,
        Err(e) => {
            rog::println!("Could not create cpu_log.txt: {}", e);
            std::process::exit(1);
        }
    };
    let mut log = std::io::BufWriter::new(file);
    while !mbrd.stop_cpu {
        let pc = mbrd.cpu.reg.pc;
        let opcode = mbrd.mmu.get(pc);
        mbrd.next()?;
        let reg = &mbrd.cpu.reg;
        writeln!(
            log,
            "PC:{:04X} OP:{:02X} AF:{:04X} BC:{:04X} DE:{:04X} HL:{:04X} SP:{:04X} IME:{}",
            pc,
            opcode,
            reg.get_af(),
            reg.get_bc(),
            reg.get_de(),
            reg.get_hl(),
            reg.sp,
            u8::from(mbrd.cpu.ime()),
        )
        .ok();
    }
    Ok(())
}
