use std::path::{Path, PathBuf};

use crate::error::LifeError;
use crate::grid::EdgePolicy;
use crate::implementations::worker::PollStrategy;

pub const DEFAULT_RESULTS_FILE: &str = "results.csv";

/// 1回の実行設定
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub generations: usize,
    pub threads: usize,
    pub poll: PollStrategy,
    pub edge: EdgePolicy,
    pub print_final: bool,
    pub results_path: PathBuf,
}

impl RunConfig {
    pub fn new(input_path: &Path, generations: usize, threads: usize) -> Self {
        RunConfig {
            input_path: input_path.to_path_buf(),
            generations,
            threads,
            poll: PollStrategy::default(),
            edge: EdgePolicy::default(),
            print_final: false,
            results_path: PathBuf::from(DEFAULT_RESULTS_FILE),
        }
    }

    /// `<入力ファイル> <世代数> [スレッド数] [--spin] [--wrap] [--print] [--results <csv>]`
    ///
    /// `args` にはプログラム名を含めない。
    pub fn from_args<I, S>(args: I) -> Result<Self, LifeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positional: Vec<String> = Vec::new();
        let mut poll = PollStrategy::default();
        let mut edge = EdgePolicy::default();
        let mut print_final = false;
        let mut results_path = PathBuf::from(DEFAULT_RESULTS_FILE);

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "--spin" => poll = PollStrategy::Spin,
                "--wrap" => edge = EdgePolicy::Wrap,
                "--print" => print_final = true,
                "--results" => {
                    let path = args.next().ok_or(LifeError::Usage)?;
                    results_path = PathBuf::from(path.as_ref());
                }
                flag if flag.starts_with("--") => {
                    return Err(LifeError::InvalidArgument(format!("不明なオプション: {}", flag)));
                }
                value => positional.push(value.to_string()),
            }
        }

        let (input, generations, threads) = match positional.as_slice() {
            [input, generations] => (input, generations, None),
            [input, generations, threads] => (input, generations, Some(threads)),
            _ => return Err(LifeError::Usage),
        };

        let config = RunConfig {
            input_path: PathBuf::from(input),
            generations: parse_count("世代数", generations)?,
            threads: match threads {
                Some(t) => parse_count("スレッド数", t)?,
                None => 1,
            },
            poll,
            edge,
            print_final,
            results_path,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LifeError> {
        if self.generations == 0 {
            return Err(LifeError::InvalidArgument("世代数は1以上である必要があります".into()));
        }
        if self.threads == 0 {
            return Err(LifeError::InvalidArgument("スレッド数は1以上である必要があります".into()));
        }
        Ok(())
    }
}

fn parse_count(name: &str, value: &str) -> Result<usize, LifeError> {
    value
        .parse::<usize>()
        .map_err(|_| LifeError::InvalidArgument(format!("{}は正の整数である必要があります: {}", name, value)))
}
