/*!
 * Sentinel Utils
 *
 * Utilitários comuns usados em toda a workspace Sentinel
 */

use ethereum_types::Address;
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

/// Converte uma string hexadecimal para Address, sem diferenciar maiúsculas
pub fn hex_to_address(hex: &str) -> Option<Address> {
    let hex_str = strip_0x(hex.trim());
    if hex_str.len() != 40 {
        return None;
    }
    Address::from_str(&hex_str.to_ascii_lowercase()).ok()
}

/// Formata um Address para exibição
pub fn format_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

/// Decodifica dados hexadecimais com ou sem prefixo `0x`
pub fn decode_hex(data: &str) -> Option<Vec<u8>> {
    hex::decode(strip_0x(data.trim())).ok()
}

/// Calcula o hash Keccak-256 de dados
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut result = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut result);
    result
}

/// Seletor de 4 bytes de uma assinatura canônica, ex.: `withdraw(address,uint256,address)`
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Extrai o seletor do call data; entradas com menos de 4 bytes não têm seletor
pub fn selector_of(input: &[u8]) -> Option<[u8; 4]> {
    input.get(..4).map(|s| [s[0], s[1], s[2], s[3]])
}

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
