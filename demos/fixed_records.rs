// Fixed-size records in a FIFO laid over a named shared memory region.
//
// cargo run --example fixed_records -- [name]
use dmxp_fifo::Core::create_shared_memory;
use dmxp_fifo::{Fifo, FifoError};
use std::env;

const RECORD_SIZE: usize = 16;

fn encode(seq: u64, value: f64, slot: &mut [u8]) {
    slot[..8].copy_from_slice(&seq.to_le_bytes());
    slot[8..16].copy_from_slice(&value.to_le_bytes());
}

fn decode(slot: &[u8]) -> (u64, f64) {
    let mut seq = [0u8; 8];
    let mut value = [0u8; 8];
    seq.copy_from_slice(&slot[..8]);
    value.copy_from_slice(&slot[8..16]);
    (u64::from_le_bytes(seq), f64::from_le_bytes(value))
}

fn main() -> Result<(), FifoError> {
    let args: Vec<String> = env::args().collect();
    let name = args.get(1).map(String::as_str);

    let region = create_shared_memory(32 * RECORD_SIZE, name)?;
    let mut fifo = Fifo::init(region, RECORD_SIZE)?;
    println!("{:?}", fifo);

    let mut seq = 0u64;
    for round in 0..4 {
        // Fill until full, then drain half
        while let Some(slot) = fifo.write_slot() {
            encode(seq, seq as f64 * 0.5, slot);
            seq += 1;
        }

        // A record claimed by mistake is handed back
        if fifo.len() == fifo.capacity() {
            fifo.read_slot();
            let slot = fifo.write_slot().ok_or(FifoError::Full)?;
            encode(u64::MAX, 0.0, slot);
            fifo.return_slot();
        }

        for _ in 0..fifo.capacity() / 2 {
            if let Some(slot) = fifo.read_slot() {
                let (s, v) = decode(slot);
                if s % 8 == 0 {
                    println!("round {}: record {} = {}", round, s, v);
                }
            }
        }
        println!("round {}: {} stored, {:?}", round, fifo.len(), fifo.positions());
    }

    if let Some(name) = name {
        println!("Region left at /dev/shm/{}", name);
    }
    Ok(())
}
