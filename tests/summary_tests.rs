use hwdash::aggregate::FAILURE_PREFIX;
use hwdash::data::*;
use hwdash::error::{HwdashError, Result};
use hwdash::service::SUMMARY_KEY;
use hwdash::{collect_summary, MonitorSource, Provider, SummaryService, TtlCache};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const GB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
enum Fault {
    Error,
    Denied,
    Panic,
}

/// In-memory provider answering from canned records
struct FixtureProvider {
    os: Vec<OsRecord>,
    computer: Vec<ComputerRecord>,
    boards: Vec<MotherboardRecord>,
    cpus: Vec<CpuRecord>,
    memory: Vec<MemoryModuleRecord>,
    gpus: Vec<GpuRecord>,
    drivers: Vec<DriverRecord>,
    drives: Vec<DriveRecord>,
    network: Vec<NetworkAdapterRecord>,
    audio: Vec<AudioDeviceRecord>,
    monitors: Vec<MonitorRecord>,
    fallback_monitors: Vec<MonitorRecord>,
    faults: Vec<(Domain, Fault)>,
    passes: AtomicUsize,
    driver_queries: AtomicUsize,
    fallback_queries: AtomicUsize,
    primary_monitor_fault: Option<Fault>,
    gate_open: AtomicBool,
}

impl FixtureProvider {
    fn empty() -> Self {
        Self {
            os: Vec::new(),
            computer: Vec::new(),
            boards: Vec::new(),
            cpus: Vec::new(),
            memory: Vec::new(),
            gpus: Vec::new(),
            drivers: Vec::new(),
            drives: Vec::new(),
            network: Vec::new(),
            audio: Vec::new(),
            monitors: Vec::new(),
            fallback_monitors: Vec::new(),
            faults: Vec::new(),
            passes: AtomicUsize::new(0),
            driver_queries: AtomicUsize::new(0),
            fallback_queries: AtomicUsize::new(0),
            primary_monitor_fault: None,
            gate_open: AtomicBool::new(true),
        }
    }

    fn workstation() -> Self {
        Self {
            os: vec![OsRecord {
                caption: "Microsoft Windows 11 Pro".to_string(),
                architecture: "64-bit".to_string(),
                build_number: "22631".to_string(),
                version: "10.0.22631".to_string(),
                install_date: "20230901120000.000000+480".to_string(),
                last_boot_up_time: String::new(),
            }],
            computer: vec![ComputerRecord {
                name: "DESKTOP-HW01".to_string(),
                manufacturer: "ASUS".to_string(),
                model: "System Product Name".to_string(),
            }],
            boards: vec![MotherboardRecord {
                manufacturer: "ASUSTeK COMPUTER INC.".to_string(),
                product: "PRIME Z790-P".to_string(),
            }],
            cpus: vec![CpuRecord {
                name: "13th Gen Intel(R) Core(TM) i7-13700K @ 3.40GHz".to_string(),
                cores: 16,
                threads: 24,
                max_clock_mhz: 3400,
            }],
            memory: vec![
                MemoryModuleRecord::new("Kingston", "KF432C16BB/16", 16 * GB, 3200),
                MemoryModuleRecord::new("Kingston", "KF432C16BB/16", 16 * GB, 3200),
            ],
            gpus: vec![
                GpuRecord {
                    name: "NVIDIA GeForce RTX 4070".to_string(),
                    adapter_ram_bytes: 12 * GB,
                },
                GpuRecord {
                    name: "Microsoft Basic Display Adapter".to_string(),
                    adapter_ram_bytes: 0,
                },
            ],
            drivers: vec![DriverRecord {
                device_name: "NVIDIA GeForce RTX 4070".to_string(),
                version: "31.0.15.5222".to_string(),
                date: "20240304000000.000000-000".to_string(),
            }],
            drives: vec![
                DriveRecord {
                    model: "Samsung SSD 990 PRO 2TB".to_string(),
                    size_bytes: 2_000_398_934_016,
                },
                DriveRecord {
                    model: "Generic- SD/MMC".to_string(),
                    size_bytes: 8 * GB,
                },
            ],
            network: vec![
                NetworkAdapterRecord {
                    name: "Intel(R) Ethernet Controller I225-V".to_string(),
                    mac_address: "A8:A1:59:00:00:01".to_string(),
                },
                NetworkAdapterRecord {
                    name: "Bluetooth Device (Personal Area Network)".to_string(),
                    mac_address: "A8:A1:59:00:00:02".to_string(),
                },
            ],
            audio: vec![
                AudioDeviceRecord {
                    name: "Realtek High Definition Audio".to_string(),
                },
                AudioDeviceRecord {
                    name: "NVIDIA High Definition Audio".to_string(),
                },
            ],
            monitors: vec![MonitorRecord {
                name: "Generic PnP Monitor (DELL U2720Q)".to_string(),
            }],
            fallback_monitors: vec![MonitorRecord {
                name: "HDMI-A-1".to_string(),
            }],
            ..Self::empty()
        }
    }

    fn with_fault(mut self, domain: Domain, fault: Fault) -> Self {
        self.faults.push((domain, fault));
        self
    }

    fn answer<T: Clone>(&self, domain: Domain, records: &[T]) -> Result<Vec<T>> {
        match self.faults.iter().find(|(d, _)| *d == domain).map(|(_, f)| *f) {
            Some(Fault::Error) => Err(HwdashError::Detection(format!("{} query timed out", domain))),
            Some(Fault::Denied) => {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied").into())
            }
            Some(Fault::Panic) => panic!("{} backend crashed", domain),
            None => Ok(records.to_vec()),
        }
    }
}

impl Provider for FixtureProvider {
    fn operating_system(&self) -> Result<Vec<OsRecord>> {
        self.passes.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        while !self.gate_open.load(Ordering::SeqCst) && started.elapsed() < Duration::from_secs(10) {
            thread::sleep(Duration::from_millis(1));
        }
        self.answer(Domain::Os, &self.os)
    }

    fn computer(&self) -> Result<Vec<ComputerRecord>> {
        self.answer(Domain::Computer, &self.computer)
    }

    fn motherboards(&self) -> Result<Vec<MotherboardRecord>> {
        self.answer(Domain::Motherboard, &self.boards)
    }

    fn cpus(&self) -> Result<Vec<CpuRecord>> {
        self.answer(Domain::Cpu, &self.cpus)
    }

    fn memory_modules(&self) -> Result<Vec<MemoryModuleRecord>> {
        self.answer(Domain::Memory, &self.memory)
    }

    fn video_controllers(&self) -> Result<Vec<GpuRecord>> {
        self.answer(Domain::Gpu, &self.gpus)
    }

    fn display_drivers(&self) -> Result<Vec<DriverRecord>> {
        self.driver_queries.fetch_add(1, Ordering::SeqCst);
        self.answer(Domain::Drivers, &self.drivers)
    }

    fn drives(&self) -> Result<Vec<DriveRecord>> {
        self.answer(Domain::Drives, &self.drives)
    }

    fn network_adapters(&self) -> Result<Vec<NetworkAdapterRecord>> {
        self.answer(Domain::Network, &self.network)
    }

    fn audio_devices(&self) -> Result<Vec<AudioDeviceRecord>> {
        self.answer(Domain::Audio, &self.audio)
    }

    fn monitors(&self, source: MonitorSource) -> Result<Vec<MonitorRecord>> {
        match source {
            MonitorSource::Primary => match self.primary_monitor_fault {
                Some(Fault::Error) => Err(HwdashError::Detection("edid query failed".to_string())),
                Some(Fault::Denied) => {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied").into())
                }
                Some(Fault::Panic) => panic!("edid reader crashed"),
                None => self.answer(Domain::Monitors, &self.monitors),
            },
            MonitorSource::Fallback => {
                self.fallback_queries.fetch_add(1, Ordering::SeqCst);
                self.answer(Domain::Monitors, &self.fallback_monitors)
            }
        }
    }
}

fn wait_until(condition: impl Fn() -> bool) {
    let started = Instant::now();
    while !condition() {
        assert!(started.elapsed() < Duration::from_secs(10), "timed out waiting");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn test_full_pass_renders_every_field() {
    let provider = FixtureProvider::workstation();
    let summary = collect_summary(&provider);

    assert_eq!(summary.os_info, "Windows 11 Pro X64");
    assert_eq!(summary.version, "23H2 10.0.22631");
    assert_eq!(summary.install_time, "2023-09-01 12:00:00");
    assert_eq!(summary.boot_time, "Unknown");
    assert_eq!(summary.computer_name, "DESKTOP-HW01");
    assert_eq!(summary.manufacturer, "ASUS");
    assert_eq!(summary.model, "System Product Name");
    assert_eq!(summary.motherboard, "ASUSTeK COMPUTER INC. PRIME Z790-P");
    assert_eq!(
        summary.cpu,
        "13th Gen Intel(R) Core(TM) i7-13700K (16 cores/24 threads 3400MHz)"
    );
    assert_eq!(
        summary.ram,
        "32.00GB DDR4 3200MHz\nKingston (2 x 16GB [KF432C16BB/16])"
    );
    assert_eq!(
        summary.gpu,
        "NVIDIA GeForce RTX 4070 (12.0GB)\nDriver: 31.0.15.5222 (2024/03/04)"
    );
    assert_eq!(summary.hdd, "Samsung SSD 990 PRO 2TB (1.8TB)");
    assert_eq!(summary.network, "Intel(R) Ethernet Controller I225-V");
    assert_eq!(
        summary.audio,
        "Realtek High Definition Audio\nNVIDIA High Definition Audio"
    );
    assert_eq!(summary.display, "DELL U2720Q");

    assert!(!summary.is_degraded());
    assert_eq!(summary.status(Domain::Memory), Some(&DomainStatus::Collected(2)));
    assert_eq!(provider.fallback_queries.load(Ordering::SeqCst), 0);
}

#[test]
fn test_driver_falls_back_to_first_entry() {
    let provider = FixtureProvider {
        gpus: vec![GpuRecord {
            name: "Intel UHD Graphics 770".to_string(),
            adapter_ram_bytes: 0,
        }],
        drivers: vec![
            DriverRecord {
                device_name: "AMD Radeon RX 7800 XT".to_string(),
                version: "23.40".to_string(),
                date: String::new(),
            },
            DriverRecord {
                device_name: "Some Capture Card".to_string(),
                version: "1.0".to_string(),
                date: String::new(),
            },
        ],
        ..FixtureProvider::workstation()
    };
    let summary = collect_summary(&provider);
    assert_eq!(summary.gpu, "Intel UHD Graphics 770\nDriver: 23.40");
}

#[test]
fn test_no_gpus_skips_driver_query() {
    let provider = FixtureProvider {
        gpus: Vec::new(),
        ..FixtureProvider::workstation()
    };
    let summary = collect_summary(&provider);
    assert_eq!(summary.gpu, "");
    assert_eq!(provider.driver_queries.load(Ordering::SeqCst), 0);
    assert_eq!(summary.status(Domain::Drivers), None);
}

#[test]
fn test_only_excluded_gpus_render_unknown() {
    let provider = FixtureProvider {
        gpus: vec![GpuRecord {
            name: "Microsoft Basic Display Adapter".to_string(),
            adapter_ram_bytes: 0,
        }],
        ..FixtureProvider::workstation()
    };
    assert_eq!(collect_summary(&provider).gpu, "Unknown");
}

#[test]
fn test_generic_monitors_use_fallback_source() {
    let provider = FixtureProvider {
        monitors: vec![MonitorRecord {
            name: "Generic PnP Monitor".to_string(),
        }],
        ..FixtureProvider::workstation()
    };
    let summary = collect_summary(&provider);
    assert_eq!(summary.display, "HDMI-A-1");
    assert_eq!(provider.fallback_queries.load(Ordering::SeqCst), 1);
}

#[test]
fn test_primary_monitor_fault_recovered_by_fallback() {
    let provider = FixtureProvider {
        primary_monitor_fault: Some(Fault::Error),
        ..FixtureProvider::workstation()
    };
    let summary = collect_summary(&provider);

    assert_eq!(summary.display, "HDMI-A-1");
    assert_eq!(summary.os_info, "Windows 11 Pro X64");
    assert!(!summary.is_degraded());
    assert!(matches!(
        summary.status(Domain::Monitors),
        Some(DomainStatus::Unavailable(_))
    ));
}

#[test]
fn test_primary_monitor_panic_without_fallback_names_is_reported() {
    let provider = FixtureProvider {
        primary_monitor_fault: Some(Fault::Panic),
        fallback_monitors: Vec::new(),
        ..FixtureProvider::workstation()
    };
    let summary = collect_summary(&provider);

    assert_eq!(summary.display, "Unknown");
    assert!(summary.os_info.starts_with(FAILURE_PREFIX));
    assert!(summary.os_info.ends_with("(monitors)"));
}

#[test]
fn test_no_monitors_anywhere_is_unknown() {
    let provider = FixtureProvider {
        monitors: Vec::new(),
        fallback_monitors: Vec::new(),
        ..FixtureProvider::workstation()
    };
    assert_eq!(collect_summary(&provider).display, "Unknown");
}

#[test]
fn test_failed_domain_reports_through_os_info() {
    let provider = FixtureProvider::workstation().with_fault(Domain::Drives, Fault::Error);
    let summary = collect_summary(&provider);

    assert!(summary.os_info.starts_with(FAILURE_PREFIX));
    assert!(summary.os_info.contains("drives query timed out"));
    assert!(summary.os_info.ends_with("(drives)"));
    assert_eq!(summary.hdd, "");
    // domains before and after the fault are intact
    assert_eq!(summary.computer_name, "DESKTOP-HW01");
    assert_eq!(summary.network, "Intel(R) Ethernet Controller I225-V");
    assert_eq!(summary.display, "DELL U2720Q");
    assert_eq!(summary.failed_domains(), vec![Domain::Drives]);
}

#[test]
fn test_panicking_provider_is_contained() {
    let provider = FixtureProvider::workstation().with_fault(Domain::Gpu, Fault::Panic);
    let summary = collect_summary(&provider);

    assert!(summary.os_info.starts_with(FAILURE_PREFIX));
    assert!(summary.os_info.contains("gpu backend crashed"));
    assert_eq!(summary.gpu, "");
    assert!(summary.ram.starts_with("32.00GB DDR4"));
    assert_eq!(summary.audio, "Realtek High Definition Audio\nNVIDIA High Definition Audio");
}

#[test]
fn test_first_failure_wins() {
    let provider = FixtureProvider::workstation()
        .with_fault(Domain::Cpu, Fault::Error)
        .with_fault(Domain::Audio, Fault::Panic);
    let summary = collect_summary(&provider);
    assert!(summary.os_info.ends_with("(cpu)"));
    assert_eq!(summary.failed_domains(), vec![Domain::Cpu, Domain::Audio]);
}

#[test]
fn test_denied_domain_keeps_default() {
    let provider = FixtureProvider::workstation().with_fault(Domain::Memory, Fault::Denied);
    let summary = collect_summary(&provider);

    assert_eq!(summary.ram, "");
    assert_eq!(summary.os_info, "Windows 11 Pro X64");
    assert!(!summary.is_degraded());
    assert!(matches!(
        summary.status(Domain::Memory),
        Some(DomainStatus::Unavailable(_))
    ));
}

#[test]
fn test_empty_provider() {
    let summary = collect_summary(&FixtureProvider::empty());
    assert_eq!(summary.os_info, "");
    assert_eq!(summary.ram, "");
    assert_eq!(summary.gpu, "");
    assert_eq!(summary.hdd, "");
    assert_eq!(summary.display, "Unknown");
    assert_eq!(summary.status(Domain::Cpu), Some(&DomainStatus::Empty));
}

#[test]
fn test_service_cold_then_warm() {
    let provider = Arc::new(FixtureProvider::workstation());
    let cache = Arc::new(TtlCache::new());
    let service = SummaryService::new(Arc::clone(&cache), provider.clone(), Duration::from_secs(60));

    let first = service.summary();
    assert_eq!(provider.passes.load(Ordering::SeqCst), 1);
    assert!(cache.contains(SUMMARY_KEY));

    let second = service.summary();
    assert!(Arc::ptr_eq(&first, &second));

    wait_until(|| !service.is_refreshing());
    assert_eq!(provider.passes.load(Ordering::SeqCst), 2);
    let refreshed = cache.get::<HardwareSummary>(SUMMARY_KEY).unwrap();
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(refreshed.cpu, first.cpu);
}

#[test]
fn test_service_deduplicates_refreshes() {
    let provider = Arc::new(FixtureProvider::workstation());
    let service = SummaryService::new(
        Arc::new(TtlCache::new()),
        provider.clone(),
        Duration::from_secs(60),
    );
    service.summary();

    provider.gate_open.store(false, Ordering::SeqCst);
    service.summary();
    assert!(service.is_refreshing());
    service.summary();
    service.summary();
    assert!(!service.spawn_refresh());

    provider.gate_open.store(true, Ordering::SeqCst);
    wait_until(|| !service.is_refreshing());
    assert_eq!(provider.passes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_service_expired_entry_collects_synchronously() {
    let provider = Arc::new(FixtureProvider::workstation());
    let service = SummaryService::new(Arc::new(TtlCache::new()), provider.clone(), Duration::ZERO);

    service.summary();
    thread::sleep(Duration::from_millis(5));
    service.summary();

    assert_eq!(provider.passes.load(Ordering::SeqCst), 2);
    assert!(!service.is_refreshing());
}
