use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::command::{Executor, Invocation, Output};

/// Executor that replays canned outputs keyed by the full command line and
/// records what was asked of it. Nothing is spawned.
///
/// Several outputs registered for the same line are returned in order; the
/// last one then repeats.
pub struct ScriptedExecutor {
    responses: Mutex<HashMap<String, VecDeque<Output>>>,
    fallback: Output,
    resolvable: HashSet<String>,
    calls: Mutex<Vec<String>>,
    inputs: Mutex<Vec<(String, String)>>,
}

impl Default for ScriptedExecutor {
    fn default() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            fallback: Output::new(1, "", ""),
            resolvable: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            inputs: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, command_line: &str, output: Output) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(command_line.to_owned())
            .or_default()
            .push_back(output);
        self
    }

    /// Output for every command line without a registered response.
    pub fn otherwise(mut self, output: Output) -> Self {
        self.fallback = output;
        self
    }

    pub fn resolvable(mut self, host: &str) -> Self {
        self.resolvable.insert(host.to_owned());
        self
    }

    /// Command lines in the order they were run.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// `(command line, stdin)` pairs.
    pub fn inputs(&self) -> Vec<(String, String)> {
        self.inputs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn was_called(&self, command_line: &str) -> bool {
        self.calls().iter().any(|c| c == command_line)
    }

    fn respond(&self, invocation: &Invocation) -> Output {
        let line = invocation.to_string();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.clone());

        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        match responses.get_mut(&line) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| self.fallback.clone()),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| self.fallback.clone()),
            None => self.fallback.clone(),
        }
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn output(&self, invocation: &Invocation) -> Output {
        self.respond(invocation)
    }

    async fn output_with_input(&self, invocation: &Invocation, input: &str) -> Output {
        self.inputs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((invocation.to_string(), input.to_owned()));
        self.respond(invocation)
    }

    async fn attached(&self, invocation: &Invocation) -> i32 {
        self.respond(invocation).code
    }

    async fn resolve(&self, host: &str) -> bool {
        self.resolvable.contains(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_outputs_then_repeat_last() {
        let executor = ScriptedExecutor::new()
            .on("id alice", Output::new(1, "", ""))
            .on("id alice", Output::ok("uid=1001"));
        let inv = Invocation::new("id").arg("alice");

        assert!(!executor.succeeds(&inv).await);
        assert!(executor.succeeds(&inv).await);
        assert!(executor.succeeds(&inv).await);
        assert_eq!(executor.calls().len(), 3);
    }
}
