use std::collections::BTreeSet;

use mwgen_reflect::{MethodDescriptor, Param};

use super::Capture;

/// Names in use inside one generated method, and the pieces every aspect
/// needs to build its body: receiver, context parameter, delegate call and
/// result bindings.
#[derive(Debug, Clone)]
pub struct MethodScope<'a> {
    method: &'a MethodDescriptor,
    receiver: String,
    capture: Capture,
    taken: BTreeSet<String>,
}

impl<'a> MethodScope<'a> {
    pub fn new(method: &'a MethodDescriptor) -> Self {
        let mut taken: BTreeSet<String> = method.params.iter().map(|p| p.name.clone()).collect();

        let receiver = if taken.contains("m") {
            fresh_in(&mut taken, "mw")
        } else {
            fresh_in(&mut taken, "m")
        };
        let capture = Capture::for_returns(&method.returns, |base| fresh_in(&mut taken, base));

        Self {
            method,
            receiver,
            capture,
            taken,
        }
    }

    pub fn name(&self) -> &'a str {
        &self.method.name
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    /// Name of the call-context parameter, if the method has one.
    pub fn context(&self) -> Option<&'a str> {
        self.method.context_param().map(|p| p.name.as_str())
    }

    /// Parameters other than the call context, in declaration order.
    pub fn value_params(&self) -> impl Iterator<Item = &'a Param> {
        self.method.value_params()
    }

    /// Reserve a local name, suffixing `base` with a counter if a parameter
    /// or earlier local already uses it.
    pub fn fresh(&mut self, base: &str) -> String {
        fresh_in(&mut self.taken, base)
    }

    /// `m.next.Name(args...)` with every parameter forwarded in order.
    pub fn delegate_call(&self) -> String {
        let args = self
            .method
            .params
            .iter()
            .map(Param::call_arg)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}.next.{}({})", self.receiver, self.method.name, args)
    }
}

fn fresh_in(taken: &mut BTreeSet<String>, base: &str) -> String {
    let mut name = base.to_string();
    let mut n = 1;
    while taken.contains(&name) {
        name = format!("{}{}", base, n);
        n += 1;
    }
    taken.insert(name.clone());
    name
}
