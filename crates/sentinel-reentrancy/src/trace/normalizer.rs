use super::{CallRecord, CallSequence, CallTrace, RawTrace};
use ethereum_types::Address;
use sentinel_core::utils::{decode_hex, hex_to_address};
use tracing::warn;

/// Converte os traces planos do indexador em uma sequência de chamadas.
///
/// A ordem de entrada é preservada. Registros com destino ou call data
/// ilegíveis não são descartados: viram chamadas sem destino ou sem seletor.
pub fn normalize_traces(traces: &[RawTrace]) -> CallSequence {
    traces
        .iter()
        .map(|trace| {
            CallRecord::new(
                trace.trace_address.clone(),
                parse_target(trace.action.to.as_deref()),
                parse_input(trace.action.input.as_deref()),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

/// Achata um frame do `callTracer` em pré-ordem, atribuindo os caminhos
pub fn flatten_call_trace(root: &CallTrace) -> CallSequence {
    let mut records = Vec::new();
    let mut path = Vec::new();
    flatten_node(root, &mut path, &mut records);
    records.into()
}

fn flatten_node(node: &CallTrace, path: &mut Vec<usize>, records: &mut Vec<CallRecord>) {
    records.push(CallRecord::new(
        path.clone(),
        parse_target(node.to.as_deref()),
        parse_input(Some(node.input.as_str())),
    ));

    if let Some(calls) = &node.calls {
        for (i, child) in calls.iter().enumerate() {
            path.push(i);
            flatten_node(child, path, records);
            path.pop();
        }
    }
}

fn parse_target(to: Option<&str>) -> Option<Address> {
    let to = to?.trim();
    if to.is_empty() {
        return None;
    }
    let address = hex_to_address(to);
    if address.is_none() {
        warn!(to, "destino de chamada inválido no trace");
    }
    address
}

fn parse_input(input: Option<&str>) -> Vec<u8> {
    match input {
        None => Vec::new(),
        Some(data) => decode_hex(data).unwrap_or_else(|| {
            warn!(len = data.len(), "call data inválido no trace");
            Vec::new()
        }),
    }
}
