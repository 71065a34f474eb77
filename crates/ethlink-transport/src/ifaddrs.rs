//! Network interface enumeration via `getifaddrs(3)`.

use std::ffi::CStr;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::{DeviceError, Result};

/// Length of an Ethernet hardware address.
pub const HW_ADDR_LEN: usize = 6;

/// Owned `getifaddrs` list, freed on drop.
struct IfAddrs {
    head: *mut libc::ifaddrs,
}

impl IfAddrs {
    fn load() -> Result<Self> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
        // SAFETY: `head` is a valid out-pointer; on success the list is
        // released exactly once in `Drop`.
        let rc = unsafe { libc::getifaddrs(&mut head) };
        if rc != 0 {
            return Err(DeviceError::InterfaceAddrs(std::io::Error::last_os_error()));
        }
        Ok(Self { head })
    }

    fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head,
            _list: PhantomData,
        }
    }
}

impl Drop for IfAddrs {
    fn drop(&mut self) {
        if !self.head.is_null() {
            // SAFETY: `head` came from a successful `getifaddrs` call.
            unsafe { libc::freeifaddrs(self.head) };
        }
    }
}

struct Iter<'a> {
    next: *mut libc::ifaddrs,
    _list: PhantomData<&'a IfAddrs>,
}

struct Entry<'a> {
    name: &'a str,
    flags: u32,
    addr: Option<&'a libc::sockaddr>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.next.is_null() {
            // SAFETY: non-null nodes of the list stay valid while the owning
            // `IfAddrs` is alive, which `'a` ties us to.
            let ifa = unsafe { &*self.next };
            self.next = ifa.ifa_next;

            if ifa.ifa_name.is_null() {
                continue;
            }
            // SAFETY: `ifa_name` is a NUL-terminated string owned by the list.
            let Ok(name) = unsafe { CStr::from_ptr(ifa.ifa_name) }.to_str() else {
                continue;
            };
            // SAFETY: a non-null `ifa_addr` points at a sockaddr owned by the list.
            let addr = unsafe { ifa.ifa_addr.as_ref() };

            return Some(Entry {
                name,
                flags: ifa.ifa_flags as u32,
                addr,
            });
        }
        None
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn is_link_layer(addr: &libc::sockaddr) -> bool {
    i32::from(addr.sa_family) == libc::AF_PACKET
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn link_layer_address(addr: &libc::sockaddr) -> Option<[u8; HW_ADDR_LEN]> {
    if !is_link_layer(addr) {
        return None;
    }
    // SAFETY: AF_PACKET entries from getifaddrs are backed by `sockaddr_ll`.
    let ll = unsafe { &*(addr as *const libc::sockaddr).cast::<libc::sockaddr_ll>() };
    if (ll.sll_halen as usize) < HW_ADDR_LEN {
        return None;
    }
    let mut mac = [0u8; HW_ADDR_LEN];
    mac.copy_from_slice(&ll.sll_addr[..HW_ADDR_LEN]);
    Some(mac)
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
fn is_link_layer(addr: &libc::sockaddr) -> bool {
    i32::from(addr.sa_family) == libc::AF_LINK
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
fn link_layer_address(addr: &libc::sockaddr) -> Option<[u8; HW_ADDR_LEN]> {
    if !is_link_layer(addr) {
        return None;
    }
    // SAFETY: AF_LINK entries from getifaddrs are backed by `sockaddr_dl`.
    let dl = unsafe { &*(addr as *const libc::sockaddr).cast::<libc::sockaddr_dl>() };
    let name_len = dl.sdl_nlen as usize;
    if (dl.sdl_alen as usize) < HW_ADDR_LEN {
        return None;
    }
    // The address follows the name inside `sdl_data` and may run past the
    // declared array, so bound it by `sdl_len` instead.
    let data_offset = std::mem::offset_of!(libc::sockaddr_dl, sdl_data);
    if data_offset + name_len + HW_ADDR_LEN > dl.sdl_len as usize {
        return None;
    }
    let mut mac = [0u8; HW_ADDR_LEN];
    // SAFETY: the range was checked against `sdl_len` above.
    unsafe {
        let base = dl.sdl_data.as_ptr().cast::<u8>().add(name_len);
        std::ptr::copy_nonoverlapping(base, mac.as_mut_ptr(), HW_ADDR_LEN);
    }
    Some(mac)
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd"
)))]
fn is_link_layer(_addr: &libc::sockaddr) -> bool {
    false
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd"
)))]
fn link_layer_address(_addr: &libc::sockaddr) -> Option<[u8; HW_ADDR_LEN]> {
    None
}

/// Look up the hardware address bound to `interface`.
///
/// Takes the first link-layer entry whose name matches exactly.
pub fn resolve_hardware_address(interface: &str) -> Result<[u8; HW_ADDR_LEN]> {
    let list = IfAddrs::load()?;
    let found = list
        .iter()
        .filter(|entry| entry.name == interface)
        .find_map(|entry| entry.addr.and_then(link_layer_address));

    match found {
        Some(mac) => {
            debug!(interface, "resolved hardware address");
            Ok(mac)
        }
        None => Err(DeviceError::NoHardwareAddress {
            interface: interface.to_string(),
        }),
    }
}

/// Names of interfaces usable for link-layer traffic: up, not loopback,
/// and carrying a link-layer address entry.
pub fn list_devices() -> Result<Vec<String>> {
    let list = IfAddrs::load()?;
    let mut out: Vec<String> = Vec::new();

    for entry in list.iter() {
        let Some(addr) = entry.addr else {
            continue;
        };
        if !is_link_layer(addr) {
            continue;
        }
        if entry.flags & libc::IFF_UP as u32 == 0 {
            continue;
        }
        if entry.flags & libc::IFF_LOOPBACK as u32 != 0 {
            continue;
        }
        if !out.iter().any(|name| name == entry.name) {
            out.push(entry.name.to_string());
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_interface_has_no_hardware_address() {
        let err = resolve_hardware_address("ethlink-missing0").unwrap_err();
        assert!(matches!(
            err,
            DeviceError::NoHardwareAddress { ref interface } if interface == "ethlink-missing0"
        ));
        assert_eq!(
            err.to_string(),
            "could not find mac address for [ethlink-missing0]"
        );
    }

    #[test]
    fn empty_name_never_matches() {
        assert!(resolve_hardware_address("").is_err());
    }

    #[test]
    fn listed_devices_are_unique_and_skip_loopback() {
        let devices = list_devices().unwrap();
        let mut sorted = devices.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), devices.len());
        assert!(!devices.iter().any(|name| name == "lo" || name == "lo0"));
    }
}
