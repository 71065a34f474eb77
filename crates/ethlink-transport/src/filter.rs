//! Kernel-side capture filter.
//!
//! The capture device runs a classic BPF program against every frame on
//! the link and only queues the ones it accepts. The program here loads
//! the Ethernet ethertype and accepts the whole frame on a match:
//!
//! ```text
//!   [0] ldh  [12]                ; ethertype
//!   [1] jeq  #ethertype jt=1 jf=0
//!   [2] ret  #0                  ; drop
//!   [3] ret  #0xffffffff         ; accept whole frame
//! ```

/// One classic BPF instruction, laid out like the kernel's `struct bpf_insn`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpfInsn {
    pub code: u16,
    pub jt: u8,
    pub jf: u8,
    pub k: u32,
}

const _: () = assert!(std::mem::size_of::<BpfInsn>() == 8);

pub const BPF_LD: u16 = 0x00;
pub const BPF_JMP: u16 = 0x05;
pub const BPF_RET: u16 = 0x06;
pub const BPF_H: u16 = 0x08;
pub const BPF_ABS: u16 = 0x20;
pub const BPF_JEQ: u16 = 0x10;
pub const BPF_K: u16 = 0x00;

/// Byte offset of the ethertype inside an Ethernet header.
pub const ETHERTYPE_OFFSET: u32 = 12;

/// Snap length returned for accepted frames.
pub const ACCEPT_WHOLE_FRAME: u32 = u32::MAX;

const fn stmt(code: u16, k: u32) -> BpfInsn {
    BpfInsn {
        code,
        jt: 0,
        jf: 0,
        k,
    }
}

const fn jump(code: u16, k: u32, jt: u8, jf: u8) -> BpfInsn {
    BpfInsn { code, jt, jf, k }
}

/// A fixed filter program that passes only one ethertype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterProgram {
    insns: [BpfInsn; 4],
}

impl FilterProgram {
    /// Build the program accepting frames whose ethertype equals `ethertype`.
    pub const fn ethertype(ethertype: u16) -> Self {
        Self {
            insns: [
                stmt(BPF_LD | BPF_H | BPF_ABS, ETHERTYPE_OFFSET),
                jump(BPF_JMP | BPF_JEQ | BPF_K, ethertype as u32, 1, 0),
                stmt(BPF_RET | BPF_K, 0),
                stmt(BPF_RET | BPF_K, ACCEPT_WHOLE_FRAME),
            ],
        }
    }

    pub fn instructions(&self) -> &[BpfInsn] {
        &self.insns
    }

    pub fn len(&self) -> usize {
        self.insns.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
