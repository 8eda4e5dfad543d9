use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ProjectFileError {
    #[error("{name}: file is not part of the project")]
    #[diagnostic(
        code(apigate::project::file_not_in_project),
        help("Referenced files must live inside the project directory and must not be excluded by .apiignore")
    )]
    FileNotInProject { name: String },

    #[error("{}: unable to read file", path.display())]
    #[diagnostic(code(apigate::project::file_read))]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to determine the current working directory")]
    #[diagnostic(code(apigate::project::working_directory))]
    WorkingDirectory(#[source] std::io::Error),

    #[error("{}: unable to scan project directory: {message}", root.display())]
    #[diagnostic(code(apigate::project::scan))]
    Scan { root: PathBuf, message: String },
}
