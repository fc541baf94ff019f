use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ts_config::{ConfigError, RunConfig, SourceConfig};
use ts_container::{BincodeContainerReader, BincodeContainerWriter, Compression, ContainerReader};
use ts_merge::MergeEngine;
use ts_sampler::{AdmissionMode, SourceSampler};
use ts_schema::Schema;
use ts_sink::Sink;
use ts_source::Source;

use crate::error::AppError;

/// Owns every long-lived piece of one run (`spec.md` §5: "the Driver is one
/// thread") and drives the per-timeslice loop in §4.D.5.
pub struct Driver {
    schema: Schema,
    sources: Vec<Source>,
    samplers: Vec<SourceSampler>,
    event_counters: Vec<u32>,
    engine: MergeEngine,
    sink: Sink,
    rng: ChaCha8Rng,
    nevents: u64,
    duration_ns: f64,
}

fn open_readers(sc: &SourceConfig) -> Result<Vec<Box<dyn ContainerReader>>, AppError> {
    sc.input_files
        .iter()
        .map(|path| {
            BincodeContainerReader::open(path)
                .map(|r| Box::new(r) as Box<dyn ContainerReader>)
                .map_err(AppError::from)
        })
        .collect()
}

impl Driver {
    pub fn new(config: RunConfig) -> Result<Self, AppError> {
        let mut readers_per_source = Vec::with_capacity(config.sources.len());
        for sc in &config.sources {
            readers_per_source.push(open_readers(sc)?);
        }

        let first_schema = readers_per_source
            .first()
            .and_then(|readers| readers.first())
            .map(|r| r.branch_schema().to_vec())
            .ok_or(ConfigError::NoSources)?;
        let schema = Schema::discover(&first_schema)?;

        let mut sources = Vec::with_capacity(config.sources.len());
        let mut samplers = Vec::with_capacity(config.sources.len());
        for (sc, readers) in config.sources.iter().zip(readers_per_source.into_iter()) {
            let mut source = Source::open(
                sc.name.clone(),
                readers,
                &schema,
                sc.repeat_on_eof,
                sc.admission.already_merged,
                sc.status_offset,
            )?;

            let mut sampler = SourceSampler::new(sc.admission.clone());
            if matches!(sc.admission.mode, AdmissionMode::WeightedResampling { .. }) {
                let gp_branch = schema.index_of("GPDoubleValues").ok_or_else(|| {
                    AppError::Config(ConfigError::MissingSourceField {
                        name: sc.name.clone(),
                        key: "GPDoubleValues (weighted resampling requires this branch)",
                    })
                })?;
                sampler.preload_weights(&mut source, gp_branch)?;
            }

            sources.push(source);
            samplers.push(sampler);
        }

        let event_counters = vec![0u32; sources.len()];
        let engine = MergeEngine::new(&schema);
        let writer = BincodeContainerWriter::create(&config.output).map_err(AppError::from)?;
        let sink = Sink::new(Box::new(writer), Compression::Fast);
        let rng = config
            .seed
            .map(ChaCha8Rng::seed_from_u64)
            .unwrap_or_else(ChaCha8Rng::from_entropy);

        Ok(Self {
            schema,
            sources,
            samplers,
            event_counters,
            engine,
            sink,
            rng,
            nevents: config.nevents,
            duration_ns: config.duration_ns,
        })
    }

    /// Runs up to `nevents` timeslices (`spec.md` §4.D.5), halting cleanly —
    /// not as an error — the moment a non-repeating source can't supply the
    /// events its draw requires. Returns the number of timeslices flushed.
    pub fn run(&mut self) -> Result<u64, AppError> {
        let mut flushed = 0u64;

        for timeslice in 0..self.nevents {
            let mut admissions = Vec::with_capacity(self.sources.len());
            let mut halt: Option<String> = None;
            for idx in 0..self.sources.len() {
                let admission = self.samplers[idx].draw(self.duration_ns, &mut self.rng);
                if admission.event_indices.is_none() && !self.sources[idx].can_provide(admission.count())
                {
                    halt = Some(self.sources[idx].name().to_string());
                    break;
                }
                admissions.push(admission);
            }

            if let Some(name) = halt {
                tracing::info!(target: "driver", timeslice, source = name.as_str(), "source exhausted, halting cleanly");
                return Err(AppError::Halted(name));
            }

            self.engine.clear_buffer();
            for idx in 0..self.sources.len() {
                let admission = admissions[idx].clone();
                for i in 0..admission.count() as usize {
                    let weight = match &admission.event_indices {
                        Some(indices) => {
                            let entry = indices[i];
                            self.sources[idx].read_at(entry)?;
                            self.samplers[idx].weight_at(entry)
                        }
                        None => {
                            self.sources[idx].read()?;
                            1.0
                        }
                    };

                    let mut t = admission.timestamps[i];
                    if let Some(beam) = self.samplers[idx].beam_params() {
                        if !self.sources[idx].already_merged() {
                            if let Some(vertex) =
                                ts_merge::first_primary_vertex(&self.schema, &self.sources[idx])
                            {
                                t = ts_sampler::attach_to_beam(t, vertex, beam, &mut self.rng);
                            }
                        }
                    }

                    let event_number = self.event_counters[idx];
                    self.engine.merge_event(
                        &self.schema,
                        &mut self.sources[idx],
                        event_number,
                        idx as u32,
                        t,
                        weight as f32,
                    )?;
                    self.event_counters[idx] += 1;

                    if admission.event_indices.is_none() {
                        self.sources[idx].advance();
                    }
                }
            }

            let header = self.engine.finish_timeslice(timeslice, self.sources.len() as u32);
            self.sink.flush(&self.schema, self.engine.buffer())?;
            flushed += 1;

            if timeslice % 10 == 0 {
                println!(
                    "progress: timeslice {}/{} ({} sources)",
                    header.index + 1,
                    self.nevents,
                    header.n_sources
                );
            }
        }

        Ok(flushed)
    }
}
