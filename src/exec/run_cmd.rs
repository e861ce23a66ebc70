use std::fs::File;
use std::io::{self, stderr, stdout, Read, Write};
use std::process::Stdio;
use std::thread;

use anyhow::{Context, Result};

use crate::fs::Fs;

use super::{Error, Invocation};

/// Run a subprocess to completion, storing its stdout and stderr next to the
/// unit's outputs and, if `echo` is set, copying them to our own stdout/stderr.
/// Based on:
/// <https://stackoverflow.com/questions/66060139/how-to-tee-stdout-stderr-from-a-subprocess-in-rust>
pub fn run_cmd(invocation: &Invocation, fs: &Fs, echo: bool) -> Result<bool> {
    let (out_file, err_file) = make_log_files(fs, invocation)?;

    log::debug!("running: {invocation}");
    let mut child = invocation
        .command()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Launch(invocation.program.clone(), e))?;

    let child_out = child.stdout.take().ok_or(Error::Attach("stdout"))?;
    let child_err = child.stderr.take().ok_or(Error::Attach("stderr"))?;

    let thread_out =
        thread::spawn(move || communicate(child_out, out_file, echo.then(stdout)));
    let thread_err =
        thread::spawn(move || communicate(child_err, err_file, echo.then(stderr)));

    let out_result = thread_out.join().map_err(|_| Error::LogThread("stdout"))?;
    let err_result = thread_err.join().map_err(|_| Error::LogThread("stderr"))?;

    let status = child
        .wait()
        .with_context(|| format!("waiting on {}", invocation.program))?;

    out_result.context("copying child stdout")?;
    err_result.context("copying child stderr")?;

    log::info!("{} finished for {} with {status}", invocation.program, invocation.label);
    Ok(status.success())
}

fn communicate<R: Read, W: Write>(
    mut stream: R,
    mut file: File,
    mut output: Option<W>,
) -> io::Result<()> {
    let mut buf = [0u8; 1024];
    loop {
        let num_read = stream.read(&mut buf)?;
        if num_read == 0 {
            break;
        }

        let buf = &buf[..num_read];
        file.write_all(buf)?;
        if let Some(output) = output.as_mut() {
            output.write_all(buf)?;
        }
    }

    Ok(())
}

fn make_log_files(fs: &Fs, invocation: &Invocation) -> Result<(File, File)> {
    let out_file = fs
        .create_file(fs.stdout(&invocation.log_prefix))
        .context("creating stdout.txt file")?;

    let err_file = fs
        .create_file(fs.stderr(&invocation.log_prefix))
        .context("creating stderr.txt file")?;

    Ok((out_file, err_file))
}
