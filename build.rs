use std::cmp::Ordering;
use std::env;
use std::process::Command;

// Instruction sets with a dedicated lane kernel module in this crate
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    cfg_flag: &'static str,
    max_vector_bits: usize,
    detected: bool,
}

impl CpuFeature {
    // Lowest number == Highest Priority
    fn priority(&self) -> usize {
        match self.name {
            "avx2" => 0,
            "sse4_1" => 1,
            "neon" => 2,
            _ => usize::MAX,
        }
    }

    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse4_1",
                cfg_flag: "sse",
                max_vector_bits: 128,
                detected: false,
            },
            CpuFeature {
                name: "avx2",
                cfg_flag: "avx2",
                max_vector_bits: 256,
                detected: false,
            },
            CpuFeature {
                name: "neon",
                cfg_flag: "neon",
                max_vector_bits: 128,
                detected: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let contents = cpuinfo.to_lowercase();
            for feature in features.iter_mut() {
                feature.detected = match feature.name {
                    // aarch64 kernels report advanced SIMD as "asimd"
                    "neon" => contents.contains("neon") || contents.contains("asimd"),
                    name => contents.contains(name),
                };
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                match feature.name {
                    "avx2" => feature.detected = contents.contains("hw.optional.avx2_0: 1"),
                    "sse4_1" => feature.detected = contents.contains("hw.optional.sse4_1: 1"),
                    "neon" => feature.detected = contents.contains("hw.optional.neon: 1"),
                    _ => {}
                }
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        for detector in Self::cpu_features_detectors() {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    fn target_supports(feature: &CpuFeature, target_arch: &str) -> bool {
        match feature.name {
            "avx2" | "sse4_1" => target_arch == "x86_64" || target_arch == "x86",
            "neon" => target_arch == "aarch64",
            _ => false,
        }
    }

    fn apply(features: &mut [CpuFeature], target_arch: &str) {
        features.sort();

        // Highest priority detected feature wins; otherwise portable scalar lanes
        let (cfg_flag, max_vector_bits) = features
            .iter()
            .find(|cpu_feature| {
                cpu_feature.detected && Self::target_supports(cpu_feature, target_arch)
            })
            .map(|cpu_feature| (cpu_feature.cfg_flag, cpu_feature.max_vector_bits))
            .unwrap_or(("fallback", 128));

        println!("cargo:rustc-cfg={cfg_flag}");
        println!("cargo:rustc-cfg=max_vector_bits=\"{max_vector_bits}\"");

        println!("cargo::rustc-check-cfg=cfg(avx2)");
        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
        println!("cargo::rustc-check-cfg=cfg(max_vector_bits, values(\"128\", \"256\"))");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let mut features = CpuFeature::features();

    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    // Host probing only says something about the target for native builds
    if host == target {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    PlatformDetector::apply(&mut features, &target_arch);
}
