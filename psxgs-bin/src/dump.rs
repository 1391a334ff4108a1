use psxgs::sim::Gp0Packet;

/// Words per line when printing packets.
const WORDS_PER_LINE: usize = 6;

pub fn print_packets(packets: &[Gp0Packet]) {
    println!("{} packets received", packets.len());
    for (n, packet) in packets.iter().enumerate() {
        println!("{:4}: {:02X} {}", n, packet.opcode(), packet.name());
        for chunk in packet.words.chunks(WORDS_PER_LINE) {
            let words = chunk.iter()
                .map(|w| format!("{:08X}", w))
                .collect::<Vec<_>>()
                .join(" ");
            println!("      {}", words);
        }
    }
}
