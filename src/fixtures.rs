#[cfg(test)]
pub mod test {
    use std::io::{self, Cursor, Write};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use crate::config::Configuration;
    use crate::decl;
    use crate::prompt::TerminalPrompter;
    use crate::schema::Schema;
    use crate::types::BaseLocation;

    /// Scripted terminal: answers come from a string, output lands in a
    /// shared buffer the test keeps a handle to.
    pub type ScriptedPrompter = TerminalPrompter<Cursor<Vec<u8>>, SharedOutput>;

    #[derive(Clone, Default)]
    pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

    impl SharedOutput {
        pub fn prompter(input: &str) -> (ScriptedPrompter, SharedOutput) {
            let out = SharedOutput::default();
            let input = Cursor::new(input.as_bytes().to_vec());
            let prompter = TerminalPrompter::new(input, out.clone());
            (prompter, out)
        }

        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A configuration rooted at `base` that answers prompts from `input`.
    pub fn config_in(base: &Path, owner: &str, input: &str) -> (Configuration, SharedOutput) {
        let (prompter, out) = SharedOutput::prompter(input);
        let config = Configuration::builder(owner)
            .base(BaseLocation::Path(base.to_path_buf()))
            .prompter(prompter)
            .build();
        (config, out)
    }

    /// Three items covering the choice, yes/no and free-text paths.
    /// Elicited in key order: color, enabled, port.
    pub fn server_schema() -> Schema {
        Schema::new()
            .item("port", decl![1..65535, "port number"])
            .item("color", decl![["red", "green", "blue"], "pick one"])
            .item("enabled", decl![true, "enable?"])
    }

    #[test]
    fn scripted_prompter_records_output() {
        use crate::prompt::Prompter;
        let (mut p, out) = SharedOutput::prompter("db1\n");
        assert_eq!(p.ask_text("host", None).unwrap(), "db1");
        assert_eq!(out.contents(), "host: ");
    }
}
