//! # 内置作业模板
//!
//! 十一种 INCAR 预设，键与值均保持原样文本（包括 `System` 的大小写）。
//! `resources/jobTemplates.json` 是同一张表的 JSON 形式。
//!
//! ## 依赖关系
//! - 被 `templates/mod.rs` 使用
//! - 纯静态数据

/// (作业类型, [(tag, value)])
pub static BUILTIN_TEMPLATES: &[(&str, &[(&str, &str)])] = &[
    (
        "bulk_relaxation_low_prec",
        &[
            ("System", "AutoVASP Low Precision Bulk Relaxation"),
            ("PREC", "NORMAL"),
            ("ENCUT", "520"),
            ("ISTART", "0"),
            ("ICHARG", "2"),
            ("ISPIN", "1"),
            ("NELM", "60"),
            ("NELMIN", "2"),
            ("NELMDL", "10"),
            ("EDIFF", "1.0E-05"),
            ("LREAL", "Auto"),
            ("IALGO", "48"),
            ("VOSKOWN", "1"),
            ("ADDGRID", ".TRUE."),
            ("EDIFFG", "-1.0E-04"),
            ("NSW", "25"),
            ("IBRION", "2"),
            ("ISIF", "3"),
            ("SIGMA", "0.10"),
            ("ISMEAR", "0"),
        ],
    ),
    (
        "bulk_relaxation_med_prec",
        &[
            ("System", "AutoVASP Med. Precision Bulk Relaxation"),
            ("PREC", "Accurate"),
            ("ENCUT", "520"),
            ("ISTART", "0"),
            ("ICHARG", "2"),
            ("ISPIN", "1"),
            ("NELM", "60"),
            ("NELMIN", "2"),
            ("NELMDL", "10"),
            ("EDIFF", "1.0E-06"),
            ("LREAL", "Auto"),
            ("IALGO", "48"),
            ("VOSKOWN", "1"),
            ("ADDGRID", ".TRUE."),
            ("EDIFFG", "-1.0E-05"),
            ("NSW", "25"),
            ("IBRION", "2"),
            ("ISIF", "3"),
            ("SIGMA", "0.10"),
            ("ISMEAR", "0"),
        ],
    ),
    (
        "bulk_relaxation_high_prec",
        &[
            ("System", "AutoVASP High Precision Bulk Relaxation"),
            ("PREC", "Accurate"),
            ("ENCUT", "520"),
            ("ISTART", "0"),
            ("ICHARG", "2"),
            ("ISPIN", "1"),
            ("NELM", "60"),
            ("NELMIN", "3"),
            ("NELMDL", "10"),
            ("EDIFF", "1.0E-07"),
            ("LREAL", "Auto"),
            ("IALGO", "48"),
            ("VOSKOWN", "1"),
            ("ADDGRID", ".TRUE."),
            ("EDIFFG", "-1.0E-06"),
            ("NSW", "25"),
            ("IBRION", "2"),
            ("ISIF", "3"),
            ("SIGMA", "0.10"),
            ("ISMEAR", "0"),
        ],
    ),
    (
        "slab_relaxation_low_prec",
        &[
            ("System", "AutoVASP Low Precision Slab Relaxation"),
            ("PREC", "NORMAL"),
            ("ENCUT", "520"),
            ("ISTART", "0"),
            ("ICHARG", "2"),
            ("ISPIN", "1"),
            ("NELM", "60"),
            ("NELMIN", "2"),
            ("NELMDL", "10"),
            ("EDIFF", "1.0E-05"),
            ("LREAL", "Auto"),
            ("IALGO", "48"),
            ("VOSKOWN", "1"),
            ("ADDGRID", ".TRUE."),
            ("EDIFFG", "-1.0E-04"),
            ("NSW", "25"),
            ("IBRION", "2"),
            ("ISIF", "2"),
            ("SIGMA", "0.10"),
            ("ISMEAR", "0"),
        ],
    ),
    (
        "slab_relaxation_med_prec",
        &[
            ("System", "AutoVASP Med. Precision Slab Relaxation"),
            ("PREC", "Accurate"),
            ("ENCUT", "520"),
            ("ISTART", "0"),
            ("ICHARG", "2"),
            ("ISPIN", "1"),
            ("NELM", "60"),
            ("NELMIN", "2"),
            ("NELMDL", "10"),
            ("EDIFF", "1.0E-06"),
            ("LREAL", "Auto"),
            ("IALGO", "48"),
            ("VOSKOWN", "1"),
            ("ADDGRID", ".TRUE."),
            ("EDIFFG", "-1.0E-05"),
            ("NSW", "25"),
            ("IBRION", "2"),
            ("ISIF", "2"),
            ("SIGMA", "0.10"),
            ("ISMEAR", "0"),
        ],
    ),
    (
        "slab_relaxation_high_prec",
        &[
            ("System", "AutoVASP High Precision Slab Relaxation"),
            ("PREC", "Accurate"),
            ("ENCUT", "520"),
            ("ISTART", "0"),
            ("ICHARG", "2"),
            ("ISPIN", "1"),
            ("NELM", "60"),
            ("NELMIN", "3"),
            ("NELMDL", "10"),
            ("EDIFF", "1.0E-07"),
            ("LREAL", "Auto"),
            ("IALGO", "48"),
            ("VOSKOWN", "1"),
            ("ADDGRID", ".TRUE."),
            ("EDIFFG", "-1.0E-06"),
            ("NSW", "25"),
            ("IBRION", "2"),
            ("ISIF", "2"),
            ("SIGMA", "0.10"),
            ("ISMEAR", "0"),
        ],
    ),
    (
        "spin_orbit",
        &[
            ("SYSTEM", "Spin-Orbit Coupling Calculation"),
            ("LSORBIT", ".TRUE."),
            ("GGA_COMPAT", ".FALSE."),
            ("VOSKOWN", "1"),
            ("LMAXMIX", "4"),
            ("ISYM", "-1"),
            ("NBANDS", "set_bands_manually"),
            ("LORBIT", "11"),
            ("EDIFF", "1.06E-06"),
        ],
    ),
    (
        "dos",
        &[
            ("System", "AutoVASP Density of States"),
            ("ISPIN", "1"),
            ("PREC", "Accurate"),
            ("NSW", "0"),
            ("ISMEAR", "-5"),
            ("ENCUT", "520"),
            ("NEDOS", "5000"),
            ("LORBIT", "11"),
            ("EMIN", "-10"),
            ("EMAX", "8"),
        ],
    ),
    (
        "band",
        &[
            ("System", "AutoVASP Band Structure Calculation"),
            ("ICHARG", "11"),
            ("ENCUT", "520"),
            ("ISMEAR", "0"),
            ("SIGMA", "0.1"),
            ("LORBIT", "11"),
        ],
    ),
    (
        "mBJ",
        &[
            ("SYSTEM", "AutoVASP generated MBJ"),
            ("METAGGA", "MBJ"),
            ("CMBJ", "1.2"),
            ("LASPH", ".TRUE."),
            ("LWAVE", ".TRUE."),
            ("LCHARG", ".TRUE."),
            ("LELF", ".TRUE."),
            ("LORBIT", "11"),
            ("LSORBIT", ".TRUE."),
            ("ENCUT", "520"),
            ("EDIFF", "1E-7"),
            ("LREAL", ".False."),
            ("ISTART", "0"),
            ("ISYM", "-1"),
            ("NELMIN", "8"),
        ],
    ),
    (
        "bdcd",
        &[
            ("SYSTEM", "Band Decomposed Charge Densiy"),
            ("LPARD", ".TRUE."),
        ],
    ),
];
