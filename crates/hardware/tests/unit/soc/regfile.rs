//! Register File Unit Tests.
//!
//! Verifies strobe-driven reads and writes, read-clearing of new data and
//! status (including a dump that coincides with the clearing read), shadow
//! I/Q read-back, the status counters, fault bits, and soft reset.

use gpsbb_core::common::addr::{
    ACCUM_COUNT_WORD, ChannelReg, FAULT_WORD, NEW_DATA_WORD, RESET_WORD, STATUS_WORD,
    TIC_COUNT_WORD, TIC_DIVIDE_WORD, WordAddr,
};
use gpsbb_core::common::signal::IfSample;
use gpsbb_core::config::{ChannelInit, Config};
use gpsbb_core::soc::regfile::{EdgeReport, RegisterFile, STATUS_ACCUM, STATUS_TIC};
use gpsbb_core::soc::{RegisterAccess, RegisterTarget};

const FIRST_DUMP: usize = 8 * 2046 + 1;

fn config(channels: usize, inits: Vec<ChannelInit>) -> Config {
    let mut config = Config::default();
    config.system.channel_count = channels;
    config.channels = inits;
    config
}

fn word(w: u8) -> u32 {
    WordAddr(w).byte()
}

fn clock(rf: &mut RegisterFile) -> EdgeReport {
    rf.clock(IfSample::default(), true)
}

fn read(rf: &mut RegisterFile, addr: u32) -> (u32, EdgeReport) {
    rf.strobe(RegisterAccess::Read { addr });
    let report = clock(rf);
    (rf.read_data(), report)
}

fn write(rf: &mut RegisterFile, addr: u32, data: u32) -> EdgeReport {
    rf.strobe(RegisterAccess::Write { addr, data });
    clock(rf)
}

fn run_to_dump(rf: &mut RegisterFile) -> usize {
    for n in 0..FIRST_DUMP + 16 * 1023 {
        if clock(rf).dumped != 0 {
            return n;
        }
    }
    panic!("no dump");
}

#[test]
fn power_on_state_follows_config() {
    let rf = RegisterFile::new(&config(2, vec![ChannelInit::default()]));
    assert_eq!(rf.channel_count(), 2);
    assert_eq!(rf.peek(ChannelReg::PrnKey.byte(0)), 1);
    assert_eq!(rf.peek(ChannelReg::PrnKey.byte(1)), 0);
    assert_eq!(rf.peek(word(TIC_DIVIDE_WORD)), 163_679);
    assert_eq!(rf.new_data(), 0);
    assert!(!rf.irq());
    assert!(rf.channel(2).is_none());
}

#[test]
fn unmapped_reads_are_zero() {
    let mut rf = RegisterFile::new(&config(1, vec![]));
    assert_eq!(rf.peek(ChannelReg::PrnKey.byte(3)), 0);
    let (value, _) = read(&mut rf, word(0xE7));
    assert_eq!(value, 0);
    let _ = write(&mut rf, word(0xE7), 5);
}

#[test]
fn read_data_holds_until_next_read() {
    let mut rf = RegisterFile::new(&config(1, vec![ChannelInit::default()]));
    let (value, report) = read(&mut rf, ChannelReg::CodeNco.byte(0));
    assert_eq!(value, 1 << 25);
    assert_eq!(
        report.access,
        Some(RegisterAccess::Read {
            addr: ChannelReg::CodeNco.byte(0)
        })
    );
    let _ = write(&mut rf, ChannelReg::CodeNco.byte(0), 77);
    for _ in 0..5 {
        let _ = clock(&mut rf);
    }
    assert_eq!(rf.read_data(), 1 << 25);
    assert_eq!(rf.peek(ChannelReg::CodeNco.byte(0)), 77);
}

#[test]
fn dump_sets_new_data_and_read_clears_it() {
    let mut rf = RegisterFile::new(&config(2, vec![ChannelInit::default()]));
    let n = run_to_dump(&mut rf);
    assert_eq!(n, FIRST_DUMP);
    assert_eq!(rf.new_data(), 0b01);
    assert!(rf.irq());

    let (value, _) = read(&mut rf, word(NEW_DATA_WORD));
    assert_eq!(value, 0b01);
    assert_eq!(rf.new_data(), 0);
    assert!(!rf.irq());
}

#[test]
fn dump_during_clearing_read_is_not_lost() {
    let mut rf = RegisterFile::new(&config(1, vec![ChannelInit::default()]));
    let _ = run_to_dump(&mut rf);
    assert_eq!(rf.new_data(), 1);

    while !rf.channel(0).expect("channel 0").dump_due() {
        let _ = clock(&mut rf);
    }
    let (value, report) = read(&mut rf, word(NEW_DATA_WORD));
    assert_eq!(report.dumped, 1);
    assert_eq!(value, 1);
    assert_eq!(rf.new_data(), 1);
}

#[test]
fn shadow_registers_serve_signed_reads() {
    let mut rf = RegisterFile::new(&config(
        1,
        vec![ChannelInit {
            prn: 1,
            carrier_fcw: 0,
            code_fcw: 1 << 25,
        }],
    ));
    let mut dumps = 0;
    while dumps < 2 {
        let chip = rf.channel(0).expect("channel 0").code_gen().chips().prompt;
        let sample = IfSample::from_bits(u8::from(!chip), 0);
        if rf.clock(sample, true).dumped != 0 {
            dumps += 1;
        }
    }
    let [_, prompt, _] = rf.shadow(0).expect("shadow");
    assert_eq!(prompt.q, -16368);
    assert_eq!(rf.peek(ChannelReg::IPrompt.byte(0)), 32736);
    assert_eq!(rf.peek(ChannelReg::QPrompt.byte(0)), 0xFFFF_C010);

    // Shadow holds until the next dump.
    for _ in 0..100 {
        let _ = clock(&mut rf);
    }
    assert_eq!(rf.peek(ChannelReg::QPrompt.byte(0)), 0xFFFF_C010);
}

#[test]
fn status_flags_and_counters() {
    let mut c = config(1, vec![]);
    c.timebase.tic_divide = 9;
    c.timebase.accum_divide = 4;
    let mut rf = RegisterFile::new(&c);

    for _ in 0..5 {
        let _ = clock(&mut rf);
    }
    assert_eq!(rf.status(), STATUS_ACCUM);
    for _ in 5..11 {
        let _ = clock(&mut rf);
    }
    assert_eq!(rf.status(), STATUS_ACCUM | STATUS_TIC);
    assert_eq!(rf.peek(word(TIC_COUNT_WORD)), 1);
    assert_eq!(rf.peek(word(ACCUM_COUNT_WORD)), 2);

    let (value, _) = read(&mut rf, word(STATUS_WORD));
    assert_eq!(value, STATUS_ACCUM | STATUS_TIC);
    assert_eq!(rf.status(), 0);
}

#[test]
fn sample_enable_gates_datapath() {
    let mut c = config(1, vec![]);
    c.timebase.tic_divide = 2;
    let mut rf = RegisterFile::new(&c);
    for _ in 0..10 {
        let report = rf.clock(IfSample::default(), false);
        assert_eq!(report.pulses, None);
    }
    assert_eq!(rf.timebase().tic_count(), 0);

    let report = rf.clock(IfSample::default(), true);
    assert!(report.pulses.is_some());
}

#[test]
fn divide_writes_read_back() {
    let mut rf = RegisterFile::new(&config(1, vec![]));
    let _ = write(&mut rf, word(TIC_DIVIDE_WORD), 999);
    assert_eq!(rf.peek(word(TIC_DIVIDE_WORD)), 999);
    assert_eq!(rf.timebase().tic_divide(), 999);
}

#[test]
fn read_only_shared_writes_are_ignored() {
    let mut rf = RegisterFile::new(&config(1, vec![]));
    let _ = write(&mut rf, word(NEW_DATA_WORD), 0xF);
    let _ = write(&mut rf, word(FAULT_WORD), 0xF);
    assert_eq!(rf.new_data(), 0);
    assert_eq!(rf.fault_bits(), 0);
}

#[test]
fn slew_raises_fault_bit_until_epoch_load() {
    let mut rf = RegisterFile::new(&config(2, vec![ChannelInit::default()]));
    let _ = write(&mut rf, ChannelReg::CodeSlew.byte(0), 2);

    let mut raised = 0;
    for _ in 0..FIRST_DUMP + 40 {
        raised += clock(&mut rf).faults_raised;
    }
    assert_eq!(raised, 1);
    assert_eq!(rf.fault_bits(), 1);
    assert_eq!(rf.peek(word(FAULT_WORD)), 1);

    let _ = write(&mut rf, ChannelReg::EpochLoad.byte(0), 0);
    let _ = clock(&mut rf);
    assert_eq!(rf.fault_bits(), 0);
}

#[test]
fn soft_reset_restores_configuration() {
    let mut rf = RegisterFile::new(&config(1, vec![ChannelInit::default()]));
    let _ = write(&mut rf, ChannelReg::PrnKey.byte(0), 9);
    let _ = write(&mut rf, word(TIC_DIVIDE_WORD), 5);
    let _ = run_to_dump(&mut rf);
    assert_eq!(rf.channel(0).expect("channel 0").prn(), 9);
    assert!(rf.irq());

    let _ = write(&mut rf, word(RESET_WORD), 1);
    assert_eq!(rf.channel(0).expect("channel 0").prn(), 1);
    assert_eq!(rf.peek(word(TIC_DIVIDE_WORD)), 163_679);
    assert_eq!(rf.new_data(), 0);
    assert_eq!(rf.timebase().tic_count(), 0);
}
